mod display;

use std::collections::HashMap;
use std::error::Error;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::{thread_rng, Rng};

use shadow_taxi::config::{parse_properties, GameContext};
use shadow_taxi::error::LoadError;
use shadow_taxi::input::{InputSnapshot, KeyState};
use shadow_taxi::score::FileScoreSink;
use shadow_taxi::simulation::Simulation;

use display::Viewport;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

const DEFAULT_CONFIG: &str = "res/app.properties";
const DEFAULT_PLAYER: &str = "PLAYER";

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Frames a key counts as down after its last press or repeat event.  At
/// 60 FPS that is about 133 ms, longer than the gap between OS key repeats,
/// so terminals without release events still see a steady hold.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

/// Arrow keys (and WASD) held this frame, folded with last frame's state
/// into press/release edges.
#[derive(Clone, Copy, Default)]
struct HeldKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    fn sample(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Self {
        HeldKeys {
            up: any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            left: any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        }
    }

    fn snapshot(&self, previous: &HeldKeys) -> InputSnapshot {
        InputSnapshot {
            up: KeyState::from_transition(previous.up, self.up),
            down: KeyState::from_transition(previous.down, self.down),
            left: KeyState::from_transition(previous.left, self.left),
            right: KeyState::from_transition(previous.right, self.right),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn read_file(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}

fn load_session(
    config_path: &str,
    player_name: &str,
) -> Result<Simulation<FileScoreSink>, LoadError> {
    let props = parse_properties(&read_file(config_path)?);
    let ctx = GameContext::from_properties(&props)?;
    let layout = read_file(&ctx.config.files.layout)?;
    let weather = read_file(&ctx.config.files.weather)?;
    let sink = FileScoreSink::new(&ctx.config.files.scores);
    let seed: u64 = thread_rng().gen();
    info!("session for {player_name} from {config_path}, seed {seed}");
    Simulation::load(ctx, &layout, &weather, seed, player_name, sink)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until Q / Esc / Ctrl-C; the final screen stays up after game over.
///
/// `key_frame` maps each key to the frame of its last press or repeat.  Keys
/// seen within `HOLD_WINDOW` frames make up this frame's held set, and
/// comparing it with last frame's set yields the press/release edges handed
/// to the simulation.  A `Release` event, where the terminal reports one,
/// drops the key at once.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation<FileScoreSink>,
    rx: &mpsc::Receiver<Event>,
) -> Result<(), Box<dyn Error>> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !sim.is_over() {
            let now = HeldKeys::sample(&key_frame, frame);
            let input = now.snapshot(&held);
            held = now;
            sim.advance(&input)?;
        }

        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, sim.context());
        display::render(out, &view, sim.context(), sim.state(), &sim.hud())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode, alternate screen, hidden cursor.  Returns whether the terminal
/// accepted the request for press/repeat/release event types.
fn enter_terminal<W: Write>(out: &mut W) -> io::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    Ok(out.execute(PushKeyboardEnhancementFlags(flags)).is_ok())
}

/// Best effort: the session result is reported either way.
fn leave_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// `shadow_taxi [PLAYER_NAME] [CONFIG_FILE]`
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let player_name = args.next().unwrap_or_else(|| DEFAULT_PLAYER.to_string());
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    // Load before touching the terminal so errors print normally.
    let mut sim = load_session(&config_path, &player_name)?;

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = enter_terminal(&mut out)?;

    // Blocking reads live on their own thread; the loop polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut sim, &rx);
    leave_terminal(&mut out, keyboard_enhanced);

    if let Err(err) = &result {
        error!("game stopped: {err}");
    }
    let state = sim.state();
    println!(
        "{}: earnings {:.2} after {} frames",
        sim.player_name(),
        state.total_earnings,
        state.frame
    );
    result
}
