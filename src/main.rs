use ursula_cli::args::Invocation;
use ursula_cli::env::Environment;
use ursula_cli::logging::init_logging;
use ursula_cli::{RunConfig, run};

fn main() {
    let config = RunConfig::from_invocation(Invocation::from_env(), Environment::new());
    init_logging(config.debug);

    let code = match run(&config, &mut std::io::stdout()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            -1
        }
    };
    std::process::exit(code);
}
