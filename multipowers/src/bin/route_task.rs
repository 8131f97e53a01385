use clap::Parser;
use multipowers::logging::init_tracing;
use multipowers::router::cli::{run, Args};

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    std::process::exit(run(args));
}
