//! Shadowbound entry point
//!
//! Headless autopilot run: walks every level along the shortest tile path,
//! printing a text rendering of the first-person view at each level start.
//!
//! Usage: `shadowbound [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::VecDeque;
    use std::path::Path;

    use shadowbound::consts::FRAME_MS;
    use shadowbound::persistence::Profile;
    use shadowbound::sim::{GridMap, RayHit, Tile, TickEvent, TickInput};
    use shadowbound::{Campaign, CampaignPhase, Tuning, normalize_angle, tile_center};

    const VIEW_COLUMNS: usize = 65;
    const VIEW_ROWS: usize = 18;
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    const MAX_RETRIES: u32 = 3;

    pub fn run() -> shadowbound::Result<()> {
        let tuning = match std::env::args().nth(1) {
            Some(path) => Tuning::load(Path::new(&path))?,
            None => Tuning::default(),
        };
        let mut campaign = Campaign::new(tuning, Profile::default(), 0x5eed);
        campaign.skip_intro();

        let mut retries = 0;
        let mut shown_level = None;
        for _ in 0..MAX_FRAMES {
            match campaign.phase() {
                CampaignPhase::Finished => break,
                CampaignPhase::Dead if retries < MAX_RETRIES => {
                    retries += 1;
                    campaign.retry();
                }
                CampaignPhase::Dead => break,
                _ => {}
            }

            let level = campaign.state().level_index;
            if shown_level != Some(level) {
                shown_level = Some(level);
                println!("Level {}", level + 1);
                println!("{}", render(&campaign.view().collect::<Vec<_>>()));
            }

            let input = autopilot(&campaign);
            match campaign.frame(FRAME_MS, &input) {
                Some(TickEvent::LevelComplete { time_secs, .. }) => {
                    println!("  cleared in {:.1}s", time_secs);
                }
                Some(TickEvent::Died) => println!("  died"),
                None => {}
            }
        }

        match campaign.summary().cloned() {
            Some(summary) => {
                let rank = campaign.record_run("Autopilot", "today");
                println!(
                    "Run complete: score {}, {:.1}s, {} guards defeated, rank {:?}",
                    summary.score, summary.time_secs, summary.kills, rank
                );
                for achievement in campaign.profile().achievements.unlocked() {
                    println!("  unlocked {}", achievement.name());
                }
            }
            None => println!(
                "Run ended on level {} with score {}",
                campaign.state().level_index + 1,
                campaign.state().score
            ),
        }
        Ok(())
    }

    /// Head for the next tile on the shortest path to the goal
    fn autopilot(campaign: &Campaign) -> TickInput {
        let state = campaign.state();
        let tile = state.tuning.tile_size;
        let here = state.player.tile(tile);
        let Some(next) = next_step(&state.grid, here) else {
            return TickInput::default();
        };
        let target = tile_center(next.0, next.1, tile);
        let to = target - state.player.pos;
        let turn = normalize_angle(to.y.atan2(to.x) - state.player.angle);
        TickInput {
            forward: turn.abs() < 0.3,
            attack: true,
            turn: turn.clamp(-0.1, 0.1),
            ..Default::default()
        }
    }

    /// Breadth-first search from `from` to the goal; returns the first step
    fn next_step(grid: &GridMap, from: (i32, i32)) -> Option<(i32, i32)> {
        let goal = grid.goal();
        if from == goal {
            return None;
        }
        let width = grid.width();
        let index = |(x, y): (i32, i32)| y as usize * width + x as usize;
        let mut parent = vec![None; width * grid.height()];
        let mut queue = VecDeque::from([from]);
        parent[index(from)] = Some(from);

        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                let mut step = cell;
                while let Some(prev) = parent[index(step)] {
                    if prev == from {
                        return Some(step);
                    }
                    step = prev;
                }
                return None;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let n = (cell.0 + dx, cell.1 + dy);
                if grid.tile_at(n.0, n.1).is_passable() && parent[index(n)].is_none() {
                    parent[index(n)] = Some(cell);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    /// Text rendering of one frame of ray hits
    fn render(hits: &[RayHit]) -> String {
        if hits.is_empty() {
            return String::new();
        }
        let mut lines = vec![String::with_capacity(VIEW_COLUMNS); VIEW_ROWS];
        let mid = VIEW_ROWS as f32 / 2.0;
        for c in 0..VIEW_COLUMNS {
            let hit = hits[c * hits.len() / VIEW_COLUMNS];
            // Height in rows, scaled so a wall at one tile fills the view
            let half = (hit.projected_height() / 64.0 * mid / 12.0).min(mid);
            let shade = match hit.tile {
                Tile::Light => ['#', '+', '.'],
                Tile::Goal => ['G', 'g', ':'],
                Tile::Wall => ['X', 'x', '-'],
                Tile::Shadow => [' ', ' ', ' '],
            };
            let glyph = shade[((1.0 - hit.depth().max(0.0)) * 3.0).min(2.0) as usize];
            for (r, line) in lines.iter_mut().enumerate() {
                let dy = (r as f32 + 0.5 - mid).abs();
                line.push(if dy < half { glyph } else { ' ' });
            }
        }
        lines.join("\n")
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shadowbound (headless) starting...");
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
