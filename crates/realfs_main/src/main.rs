use clap::Parser;
use realfs::RealFS;
use realfs_domain::Fs;
use realfs_main::{init_tracing, run, Cli, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.merge_cli(&cli);
    let _guard = init_tracing(&config)?;

    let fs = RealFS::new();
    if let Some(mask) = config.umask {
        fs.change_umask(mask);
    }

    let mut stdout = std::io::stdout().lock();
    run(&fs, cli.command, &mut stdout)
}
