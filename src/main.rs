use anyhow::{Context, Result};
use fpl_live::config::Config;
use fpl_live::engine::{squad_predicted_bonus, AutoSubEngine, BonusAllocator, FixtureBonusResult};
use fpl_live::feed::types::{Bootstrap, Fixture};
use fpl_live::feed::{self, GameweekSnapshot};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fpl-live <snapshot-dir> [--config <path>]";

struct Args {
    snapshot_dir: PathBuf,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut snapshot_dir = None;
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ if snapshot_dir.is_none() => snapshot_dir = Some(PathBuf::from(&arg)),
            _ => anyhow::bail!("unexpected argument: {}\n{}", arg, USAGE),
        }
    }
    Ok(Args {
        snapshot_dir: snapshot_dir.context(USAGE)?,
        config_path,
    })
}

fn player_name(bootstrap: &Bootstrap, id: u32) -> String {
    bootstrap
        .element(id)
        .map(|e| e.web_name.clone())
        .unwrap_or_else(|| format!("#{}", id))
}

fn fixture_header(bootstrap: &Bootstrap, result: &FixtureBonusResult, fixture: Option<&Fixture>) -> String {
    let home = bootstrap.team_name(result.team_h_id).unwrap_or("?");
    let away = bootstrap.team_name(result.team_a_id).unwrap_or("?");
    let Some(fixture) = fixture else {
        return format!("Fixture {}: {} v {}", result.fixture_id, home, away);
    };
    let score = match (fixture.team_h_score, fixture.team_a_score) {
        (Some(h), Some(a)) => format!("{}-{}", h, a),
        _ => "v".to_string(),
    };
    let kickoff = fixture
        .kickoff_time
        .map(|t| format!(" (KO {})", t.format("%a %d %b %H:%M")))
        .unwrap_or_default();
    format!(
        "Fixture {}: {} {} {}, {}'{}",
        result.fixture_id, home, score, away, fixture.minutes, kickoff
    )
}

fn print_bonus_table(bootstrap: &Bootstrap, result: &FixtureBonusResult, fixture: Option<&Fixture>) {
    println!("  {}", fixture_header(bootstrap, result, fixture));
    for award in result.bonuses.iter().filter(|a| a.predicted_bonus > 0) {
        println!(
            "    {:>2}. {:<20} {:>4} bps  +{}",
            award.rank,
            player_name(bootstrap, award.player_id),
            award.bps,
            award.predicted_bonus
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fpl_live=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => Config::load(path)?,
        None if Path::new("config.toml").exists() => Config::load(Path::new("config.toml"))?,
        None => Config::default(),
    };

    let snapshot = GameweekSnapshot::load_dir(&args.snapshot_dir)?;
    let fixtures = snapshot.gameweek_fixtures();
    let scores = feed::fixture_scores(&snapshot.live, &snapshot.bootstrap, &fixtures);

    let allocator = BonusAllocator::new(&config.bonus);
    let results = allocator.allocate_in_play(&snapshot.fixture_states(), &scores);

    println!();
    match snapshot.gameweek() {
        Some(gw) => println!("  Gameweek {}", gw),
        None => println!("  Gameweek ?"),
    }
    println!();
    println!("  Predicted bonus ({} fixtures in play)", results.len());
    for result in &results {
        let fixture = fixtures.iter().find(|f| f.id == result.fixture_id);
        print_bonus_table(&snapshot.bootstrap, result, fixture);
    }

    let squad_bonus = squad_predicted_bonus(&feed::selections(&snapshot.picks), &results);
    println!();
    println!("  Squad predicted bonus: {}", squad_bonus.total);

    let squad = feed::build_squad(
        &snapshot.picks,
        &snapshot.live,
        &snapshot.bootstrap,
        &fixtures,
        &results,
    );
    let engine = AutoSubEngine::new(config.formation);
    let outcome = feed::evaluate_squad(&snapshot.picks, &squad, &engine);

    println!();
    if snapshot.picks.bench_boost() {
        println!("  Scoring squad (Bench Boost)");
    } else {
        println!("  Effective XI");
    }
    for player in &outcome.applied_team {
        println!(
            "    {:<3} {:<20} {:>3} min  {:>3} pts{}",
            player.position.label(),
            player_name(&snapshot.bootstrap, player.id),
            player.minutes_played,
            player.effective_points(),
            if player.multiplier > 1 { format!(" (x{})", player.multiplier) } else { String::new() }
        );
    }
    if !outcome.explanations.is_empty() {
        println!();
        println!("  Auto-subs");
        for note in &outcome.explanations {
            println!("    {}", note);
        }
    }
    println!();
    println!("  Total points: {}", outcome.total_points);
    println!();

    Ok(())
}
