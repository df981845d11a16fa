use daygrid::application::Cli;

fn main() -> anyhow::Result<()> {
    Cli::run()
}
