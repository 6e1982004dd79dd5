//! Headless self-play of the battler.
//!
//! Both players answer every query at random. Pass a seed as the first
//! argument; `RUST_LOG=engine::flow=debug` shows the turn flow.

use flow_ccg::games::battler::{starter_deck, BattleConfig, BattleGame};
use flow_ccg::{GameRng, PlayerId, RandomDecisions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}

fn main() -> flow_ccg::Result<()> {
    init_logging();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(7);
    let config = BattleConfig::new().with_seed(seed);
    let decisions = RandomDecisions::new(GameRng::new(seed ^ 0x5eed)).with_decline_probability(0.05);

    let mut game = BattleGame::new(config, decisions)?;
    for id in [PlayerId::new(0), PlayerId::new(1)] {
        game.initialize_player(id, starter_deck())?;
    }
    let result = game.run()?;

    tracing::info!(?result, turns = game.turns(), seed, "self-play finished");
    Ok(())
}
