//! Glenblade entry point
//!
//! On the web the JavaScript host drives `glenblade::web::GameHandle`.
//! Natively this runs a short scripted skirmish headless and logs the cues,
//! which is handy for checking tuning files without a browser.
//!
//! Usage: `glenblade [tuning.json] [layout.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Glenblade (native, headless) starting...");

    if let Err(e) = demo::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is glenblade::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;

    use glenblade::sim::{Collidable, GameEvent, GamePhase, SimState, TickInput, tick};
    use glenblade::{ConfigError, Settings, Tuning, WorldLayout};

    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, thiserror::Error)]
    pub enum DemoError {
        #[error("reading {0}: {1}")]
        Io(String, #[source] std::io::Error),
        #[error("loading {0}: {1}")]
        Config(String, #[source] ConfigError),
    }

    fn read(path: &str) -> Result<String, DemoError> {
        std::fs::read_to_string(path).map_err(|e| DemoError::Io(path.to_string(), e))
    }

    /// A small glade: a tree, a house, two goblins
    fn default_layout() -> WorldLayout {
        WorldLayout {
            player_spawn: Vec3::ZERO,
            collidables: vec![
                Collidable::radial(Vec3::new(3.0, 0.0, -2.0), 0.8),
                Collidable::boxed(Vec3::new(-6.0, 0.0, -6.0), Vec3::new(2.0, 1.5, 2.0)),
            ],
            enemies: vec![Vec3::new(0.0, 0.0, -4.0), Vec3::new(4.0, 0.0, -7.0)],
        }
    }

    /// Scripted input for frame `n`
    fn script(frame: usize) -> TickInput {
        let mut input = TickInput::default();
        match frame {
            0 => input.toggle_lock = true,
            1..=40 => input.forward = true,
            125 => input.jump = true,
            f if (60..=600).contains(&f) && f % 30 == 0 => input.attack = true,
            _ => {}
        }
        input
    }

    pub fn run(args: Vec<String>) -> Result<(), DemoError> {
        let tuning = match args.first() {
            Some(path) => {
                Tuning::from_json(&read(path)?).map_err(|e| DemoError::Config(path.clone(), e))?
            }
            None => Tuning::default(),
        };
        let layout = match args.get(1) {
            Some(path) => WorldLayout::from_json(&read(path)?)
                .map_err(|e| DemoError::Config(path.clone(), e))?,
            None => default_layout(),
        };

        let mut state = SimState::new(42, tuning);
        state.apply_settings(&Settings::load());
        layout.populate(&mut state);

        for frame in 0..720 {
            tick(&mut state, &script(frame), None, FRAME_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::FootstepDust { .. } => log::trace!("{:?}", event),
                    _ => log::info!("[{:6.2}s] {:?}", state.time, event),
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        let health = state.player.as_ref().map(|p| p.health).unwrap_or(0);
        log::info!(
            "Finished at {:.2}s: player health {}, {} enemies left, camera at {:?}",
            state.time,
            health,
            state.enemies.len(),
            state.camera.eye()
        );
        Ok(())
    }
}
