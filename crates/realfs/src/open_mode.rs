use std::fs::OpenOptions;
use std::io;

/// Translates an fopen-style mode string (`r`, `w+`, `ab`, `c+t`, ...) into
/// open options.
pub(crate) fn open_options(mode: &str) -> io::Result<OpenOptions> {
    let mut chars = mode.chars();
    let base = chars.next();
    let mut plus = false;
    for c in chars {
        match c {
            '+' => plus = true,
            // binary/text/close-on-exec modifiers have no effect here
            'b' | 't' | 'e' => {}
            _ => return Err(invalid(mode)),
        }
    }

    let mut options = OpenOptions::new();
    match base {
        Some('r') => options.read(true).write(plus),
        Some('w') => options.write(true).create(true).truncate(true).read(plus),
        Some('a') => options.append(true).create(true).read(plus),
        Some('x') => options.write(true).create_new(true).read(plus),
        Some('c') => options.write(true).create(true).read(plus),
        _ => return Err(invalid(mode)),
    };
    Ok(options)
}

fn invalid(mode: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid open mode '{mode}'"))
}
