use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cybernation::{
    save_report_to_path, CardSource, Simulation, SimulationConfig, TileState, Token,
};

const DEFAULT_CARD_PATH: &str = "./assets/disruption.json";
const USAGE: &str = "Usage: cybernation --turns=N [options]
  --turns=N          number of turns, 1..=100 (required unless --random-init)
  --seed=S           64-bit RNG seed (default 1)
  --sK=STATE         initial state for stack K, e.g. --s3=DEVA
                     (states: WILDS, WASTES, DEVA, DEVB; default WILDS)
  --limit=KIND:N,... pool capacity overrides, e.g. --limit=WILDS:30,DEVA:10
  --disruption[=path] enable the disruption deck (default ./assets/disruption.json)
  --random-init      roll turns and all initial states from a fixed seed
  --out=path         report path (default assets/simulation_result_<ts>.json)";

fn main() {
    let mut turns: Option<u32> = None;
    let mut seed: u64 = 1;
    let mut initial: Vec<(u8, TileState)> = Vec::new();
    let mut limits: Vec<(Token, u32)> = Vec::new();
    let mut cards = CardSource::None;
    let mut out: Option<PathBuf> = None;
    let mut random_init = false;

    for arg in env::args().skip(1) {
        if arg == "--help" || arg == "-h" {
            println!("{}", USAGE);
            return;
        } else if arg == "--random-init" {
            random_init = true;
        } else if arg == "--disruption" {
            cards = CardSource::Path(PathBuf::from(DEFAULT_CARD_PATH));
        } else if let Some(value) = arg.strip_prefix("--disruption=") {
            cards = CardSource::Path(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--turns=") {
            match value.parse::<u32>() {
                Ok(n) => turns = Some(n),
                Err(_) => die(&format!("Invalid turn count: {}", value)),
            }
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            match value.parse::<u64>() {
                Ok(s) => seed = s,
                Err(_) => die(&format!("Invalid seed: {}", value)),
            }
        } else if let Some(value) = arg.strip_prefix("--limit=") {
            for part in value.split(',') {
                match parse_limit(part) {
                    Some(pair) => limits.push(pair),
                    None => die(&format!("Invalid limit entry: {}", part)),
                }
            }
        } else if let Some(value) = arg.strip_prefix("--out=") {
            out = Some(PathBuf::from(value));
        } else if let Some(rest) = arg.strip_prefix("--s") {
            match parse_initial_state(rest) {
                Some(pair) => initial.push(pair),
                None => die(&format!("Invalid stack state flag: {}", arg)),
            }
        } else {
            die(&format!("Unknown flag: {}\n{}", arg, USAGE));
        }
    }

    if random_init {
        // Fixed-seed roll for turns and every stack.
        let mut roll = SmallRng::seed_from_u64(50);
        let rolled_turns = roll.random_range(1..100u32);
        println!("The turn number was randomly set to {}.", rolled_turns);
        turns = Some(rolled_turns);
        for id in 1..=11u8 {
            let state = TileState::from_token(Token::ALL[roll.random_range(0..Token::ALL.len())]);
            println!("Stack {} randomly set to {}", id, state.name());
            initial.push((id, state));
        }
    }

    let Some(turns) = turns else {
        die(&format!("Missing --turns\n{}", USAGE));
    };

    let mut config = SimulationConfig::new(turns, seed).with_cards(cards);
    for (id, state) in initial {
        config = config.with_initial_state(id, state);
    }
    for (token, limit) in limits {
        config = config.with_pool_limit(token, limit);
    }

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => die(&format!("Invalid configuration: {}", err)),
    };

    println!("Init states => {}", stacks_line(&sim));
    if sim.disruption_active() {
        println!("Disruption deck enabled");
    }

    for t in 1..=turns {
        let events = sim.advance_turn();
        println!("Turn {} done.", t);
        println!("Stacks => {}", stacks_line(&sim));
        for event in events {
            println!("  {}", event);
        }
    }

    let report = sim.report();
    let path = out.unwrap_or_else(default_report_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            if let Err(err) = fs::create_dir_all(dir) {
                die(&format!("Failed to create {}: {}", dir.display(), err));
            }
        }
    }
    match save_report_to_path(&report, &path) {
        Ok(()) => println!("Exported to {}", path.display()),
        Err(err) => die(&format!("Failed to export report: {}", err)),
    }
}

fn die(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

/// Parse one `KIND:N` capacity override.
fn parse_limit(part: &str) -> Option<(Token, u32)> {
    let (kind, value) = part.split_once(':')?;
    let token = Token::from_name(kind)?;
    let limit = value.parse::<u32>().ok()?;
    Some((token, limit))
}

/// Parse the tail of a `--sK=STATE` flag (the `K=STATE` part).
fn parse_initial_state(rest: &str) -> Option<(u8, TileState)> {
    let (id, name) = rest.split_once('=')?;
    let id = id.parse::<u8>().ok()?;
    if !(1..=11).contains(&id) {
        return None;
    }
    let state = TileState::from_name(name)?;
    Some((id, state))
}

fn stacks_line(sim: &Simulation) -> String {
    sim.stack_states()
        .iter()
        .enumerate()
        .map(|(i, state)| format!("{}:{}", i + 1, state.name()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn default_report_path() -> PathBuf {
    let (secs, nanos) = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs(), d.subsec_nanos()))
        .unwrap_or((0, 0));
    PathBuf::from(format!("assets/simulation_result_{}_{}.json", secs, nanos))
}
