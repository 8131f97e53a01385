use clap::Parser;
use multipowers::logging::init_tracing;
use multipowers::workflow::cli::{run, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let code = run(args).await;
    std::process::exit(code);
}
