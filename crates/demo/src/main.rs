use demo::{NumberStack, OUTPUT_FILE, add, logged, process_data};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stack = NumberStack::new(vec![10, 20, 30]);
    println!("Stack size: {}", stack.len());

    match logged("process_data", || process_data(100, stack, 2, add, OUTPUT_FILE)) {
        Ok(score) => println!("Final Score: {score}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
