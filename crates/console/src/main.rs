use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use classical_engine::{Agent, ClassicalEngine, EngineConfig};
use log::{info, warn};
use xiangqi_core::{Engine, Move, Repetition, SearchLimits, Side, Verdict, parse_move};

const CONFIG_ENV: &str = "XIANGQI_CONFIG";
const CONFIG_FILE: &str = "xiangqi.toml";

const HELP: &str = "\
commands:
  m <move>        play a move, e.g. m b2e2
  u               take back the last move
  g [red|black]   list legal moves
  a [red|black]   list captures
  s [depth]       search and play (no depth: configured time budget)
  e               evaluate the position
  f               print the position as FEN
  p <fen>         set up a position
  o <name> <val>  set an engine option
  n               new game
  q               quit";

enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays the board and command output.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut agent = Agent::new(ClassicalEngine::with_config(load_config()));
    info!("{} ready", agent.engine().name());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", agent.position())?;
    prompt(&mut stdout, &agent)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            prompt(&mut stdout, &agent)?;
            continue;
        }

        match handle(&mut agent, &parts, &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(stdout, "error: {err:#}")?,
        }
        prompt(&mut stdout, &agent)?;
    }
    Ok(())
}

/// Config from `$XIANGQI_CONFIG`, else `./xiangqi.toml` if present, else
/// defaults. A broken file is reported and ignored.
fn load_config() -> EngineConfig {
    let path = match env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if !local.exists() {
                return EngineConfig::default();
            }
            local
        }
    };
    match EngineConfig::load(&path) {
        Ok(config) => {
            info!("loaded config from {}", path.display());
            config
        }
        Err(err) => {
            warn!("ignoring config {}: {err}", path.display());
            EngineConfig::default()
        }
    }
}

fn prompt(out: &mut impl Write, agent: &Agent) -> io::Result<()> {
    write!(out, "{}> ", agent.side_to_move())?;
    out.flush()
}

fn parse_side(arg: Option<&&str>, default: Side) -> Result<Side> {
    match arg.map(|s| s.to_ascii_lowercase()) {
        None => Ok(default),
        Some(s) if s == "r" || s == "red" || s == "w" => Ok(Side::Red),
        Some(s) if s == "b" || s == "black" => Ok(Side::Black),
        Some(s) => bail!("unknown side '{s}'"),
    }
}

fn print_moves(out: &mut impl Write, moves: &[Move]) -> Result<()> {
    let list: Vec<String> = moves.iter().map(Move::to_string).collect();
    writeln!(out, "{} move(s): {}", list.len(), list.join(" "))?;
    Ok(())
}

fn report_repetition(out: &mut impl Write, agent: &mut Agent) -> Result<()> {
    match agent.repetition() {
        Some(Repetition::Draw) => writeln!(out, "position repeated: draw")?,
        Some(Repetition::PerpetualCheck(side)) => {
            writeln!(out, "position repeated: {side} gave perpetual check and loses")?
        }
        None => {}
    }
    Ok(())
}

fn handle(agent: &mut Agent, parts: &[&str], out: &mut impl Write) -> Result<Flow> {
    match parts[0] {
        "m" => {
            let txt = parts.get(1).ok_or_else(|| anyhow!("usage: m <move>"))?;
            let mv = parse_move(txt)?;
            if !agent.play(mv) {
                bail!("illegal move {mv}");
            }
            writeln!(out, "{}", agent.position())?;
            report_repetition(out, agent)?;
        }
        "u" => {
            if !agent.unmove() {
                bail!("nothing to take back");
            }
            writeln!(out, "{}", agent.position())?;
        }
        "g" => {
            let side = parse_side(parts.get(1), agent.side_to_move())?;
            print_moves(out, &agent.moves_for(side))?;
        }
        "a" => {
            let side = parse_side(parts.get(1), agent.side_to_move())?;
            print_moves(out, &agent.attacks_for(side))?;
        }
        "s" => {
            let result = match parts.get(1) {
                Some(d) => {
                    let depth: u8 = d.parse().with_context(|| format!("bad depth '{d}'"))?;
                    agent.search_with(SearchLimits::depth(depth))
                }
                None => agent.search_default(),
            };
            writeln!(
                out,
                "depth {} score {} nodes {}{}",
                result.depth,
                result.score,
                result.nodes,
                if result.stopped { " (stopped)" } else { "" }
            )?;
            match result.verdict() {
                Verdict::Move(mv) => {
                    if !agent.play(mv) {
                        bail!("engine returned illegal move {mv}");
                    }
                    writeln!(out, "engine plays {mv}")?;
                    writeln!(out, "{}", agent.position())?;
                    report_repetition(out, agent)?;
                }
                Verdict::NoLegalMoves => {
                    writeln!(out, "{} has no legal moves and loses", agent.side_to_move())?;
                }
                Verdict::Aborted => writeln!(out, "search stopped before depth 1")?,
            }
        }
        "e" => writeln!(out, "{}", agent.evaluate())?,
        "f" => writeln!(out, "{}", agent.fen())?,
        "p" => {
            if parts.len() < 2 {
                bail!("usage: p <fen>");
            }
            agent.set_fen(&parts[1..].join(" "))?;
            writeln!(out, "{}", agent.position())?;
        }
        "o" => {
            let (name, value) = match parts {
                [_, name, value] => (*name, *value),
                _ => bail!("usage: o <name> <value>"),
            };
            if !agent.engine_mut().set_option(name, value) {
                bail!("option {name} not set");
            }
        }
        "n" => {
            agent.new_game();
            writeln!(out, "{}", agent.position())?;
        }
        "h" | "help" | "?" => writeln!(out, "{HELP}")?,
        "q" | "quit" => return Ok(Flow::Quit),
        other => bail!("unknown command '{other}', try h"),
    }
    Ok(Flow::Continue)
}
