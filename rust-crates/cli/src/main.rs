use chrono::Utc;
use clap::{
    ArgGroup,
    Parser,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use lobby::{
    GameAggregator,
    RankedGame,
    rank_games,
    schedule,
    sort_games_default,
    sort_games_launching,
};
use multicall::{
    Address,
    client::http::HttpGateway,
};
use networks::{
    BoundsStore,
    GameBounds,
    NetworkEnv,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    group(
        ArgGroup::new("network")
            .args(["local", "test", "main"])
            .required(true)
    )
)]
struct Args {
    /// Read gateway endpoint that evaluates batched calls
    #[arg(short, long)]
    gateway_url: Url,

    /// Address of the platform registry contract
    #[arg(short, long)]
    registry: String,

    /// Viewing account; enables the played/lost ordering rules
    #[arg(short, long)]
    account: Option<String>,

    /// Use the "launching soon" ordering instead of the default listing
    #[arg(long)]
    launching: bool,

    /// Keep polling instead of printing a single listing
    #[arg(short, long)]
    watch: bool,

    #[arg(long, default_value = "10")]
    interval_secs: u64,

    #[arg(short, long, default_value = "false")]
    tracing: bool,

    #[arg(long)]
    local: bool,

    #[arg(long)]
    test: bool,

    #[arg(long)]
    main: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

async fn handle_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(_) => tracing::info!("Received interrupt, exiting"),
        Err(_) => tracing::warn!("Received interrupt error, exiting anyway"),
    }
}

fn format_next_draw(ranked: &RankedGame) -> String {
    match schedule::parse(&ranked.game.settings.encoded_cron) {
        Ok(schedule) => schedule
            .next_occurrence(Utc::now())
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => "unscheduled".to_string(),
    }
}

fn status_label(ranked: &RankedGame) -> &'static str {
    if ranked.status.is_paused {
        "paused"
    } else if ranked.game.finished {
        "finished"
    } else if ranked.status.is_in_progress {
        "running"
    } else {
        "open"
    }
}

fn print_listing(games: &[RankedGame]) {
    println!(
        "{:<24} {:>6} {:>9} {:>10} {:>8} {:<9} {:<20}",
        "NAME", "ROUND", "PLAYERS", "REMAINING", "FEE", "STATUS", "NEXT DRAW"
    );
    for ranked in games {
        let settings = &ranked.game.settings;
        let fee = if ranked.status.is_free {
            "free".to_string()
        } else {
            settings.registration_amount.to_string()
        };
        let user_marker = match ranked.status.user {
            Some(user) if user.is_playing && user.has_lost => " (lost)",
            Some(user) if user.is_playing => " (playing)",
            _ => "",
        };
        println!(
            "{:<24} {:>6} {:>9} {:>10} {:>8} {:<9} {:<20}{}",
            settings.name,
            ranked.game.identity.round_id,
            format!(
                "{}/{}",
                ranked.status.player_addresses_count, settings.max_players
            ),
            ranked.status.remaining_players_count,
            fee,
            status_label(ranked),
            format_next_draw(ranked),
            user_marker,
        );
    }
}

async fn run_cycle(
    aggregator: &GameAggregator<HttpGateway>,
    registry: Address,
    viewer: Option<Address>,
    launching: bool,
) -> Result<Vec<RankedGame>> {
    let identities = aggregator
        .deployed_games(registry)
        .await
        .map_err(|e| eyre!("fetching the deployed game list failed: {e:#}"))?;
    let games = aggregator
        .refresh(&identities)
        .await
        .map_err(|e| eyre!("refreshing game snapshots failed: {e:#}"))?;
    let mut ranked = rank_games(games, viewer.as_ref());
    // both comparators rely on the sort being stable for equal ranks
    if launching {
        ranked.sort_by(sort_games_launching);
    } else {
        ranked.sort_by(sort_games_default);
    }
    Ok(ranked)
}

fn print_bounds(env: NetworkEnv, bounds: &GameBounds) {
    tracing::info!(
        "{env}: players {}..={}, draw hours {:?}",
        bounds.min_players,
        bounds.max_players,
        bounds.authorized_cron_hours,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }

    let env = if args.local {
        NetworkEnv::Local
    } else if args.test {
        NetworkEnv::Test
    } else {
        NetworkEnv::Main
    };
    networks::ensure_structure().map_err(|e| eyre!(e))?;
    let bounds = BoundsStore::new(env)
        .map_err(|e| eyre!(e))?
        .load_or_default()
        .map_err(|e| eyre!(e))?;
    print_bounds(env, &bounds);

    let registry: Address = args
        .registry
        .parse()
        .map_err(|e| eyre!("parsing --registry address: {e}"))?;
    let viewer: Option<Address> = args
        .account
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| eyre!("parsing --account address: {e}"))?;
    let gateway = HttpGateway::new(args.gateway_url.as_str()).map_err(|e| eyre!(e))?;
    let aggregator = GameAggregator::new(gateway);

    if !args.watch {
        let ranked = run_cycle(&aggregator, registry, viewer, args.launching).await?;
        print_listing(&ranked);
        return Ok(());
    }

    // Polling refresh: every cycle rebuilds complete snapshots, so the
    // listing never mixes old and new per-field data.
    let mut poll = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    let interrupt = handle_interrupt();
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            _ = poll.tick() => {
                match run_cycle(&aggregator, registry, viewer, args.launching).await {
                    Ok(ranked) => print_listing(&ranked),
                    Err(err) => tracing::error!("refresh cycle failed: {err:#}"),
                }
            }
            _ = &mut interrupt => {
                return Ok(());
            }
        }
    }
}
