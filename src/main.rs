//! Headless demo driver
//!
//! Pours a pile into a default-configured engine, lets it settle, then
//! exercises an increment and a decrement, logging settle times. Run with
//! `RUST_LOG=debug` for per-coin events. An optional first argument seeds
//! the RNG.

use coinpile::{Engine, EngineConfig};

fn settle(engine: &mut Engine) -> u32 {
    let mut frames = 0;
    while engine.is_active() {
        engine.tick();
        frames += 1;
    }
    frames
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut engine = Engine::new(EngineConfig::default(), seed);

    engine.set_target(12);
    log::info!("pour-in of 12 settled in {} frames", settle(&mut engine));

    engine.set_target(15);
    log::info!("increment to 15 settled in {} frames", settle(&mut engine));

    engine.set_target(9);
    log::info!("decrement to 9 settled in {} frames", settle(&mut engine));

    let json = serde_json::to_string_pretty(engine.snapshot())
        .expect("snapshot serializes");
    println!("{json}");
}
