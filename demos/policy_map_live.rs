use std::{thread, time::Duration};

use policy_map::{
    table::{Action, StateActionKey},
    viz, PolicyMapConfig, SharedTable,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ALPHA: f64 = 0.1;

/// Stands in for a real agent: visits random states and nudges their values towards a fixed
/// rule (jump when below the gap or falling fast)
fn fake_learner(table: SharedTable) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut visits = 0u64;
    loop {
        let diff_y = rng.gen_range(-60..=60);
        let speed_y = rng.gen_range(-900..=900);
        let tube_x = rng.gen_range(0..=40);
        let action = if rng.gen_bool(0.5) {
            Action::Jump
        } else {
            Action::Stay
        };

        let should_jump = f64::from(diff_y) + f64::from(speed_y) / 30.0 > 0.0;
        let reward = if should_jump == (action == Action::Jump) {
            1.0
        } else {
            -1.0
        };

        let key = StateActionKey::new(diff_y, speed_y, tube_x, action).to_string();
        table.update(|map| {
            let q = map.entry(key).or_insert(0.0);
            *q += ALPHA * (reward - *q);
        });

        visits += 1;
        if visits % 5000 == 0 {
            log::info!("{visits} visits, {} states in table", table.len());
        }
        thread::sleep(Duration::from_micros(200));
    }
}

fn main() {
    let table = SharedTable::new();
    let config = PolicyMapConfig {
        width: 200.0,
        height: 128.0,
        min_radius: 2.0,
        radius_scale: 5.0,
        ..Default::default()
    };

    let handle = match viz::init(table.clone(), config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("invalid policy map config: {e}");
            return;
        }
    };

    let learner = table.clone();
    thread::spawn(move || fake_learner(learner));

    if let Ok(Err(e)) = handle.join() {
        eprintln!("viewer failed: {e}");
    }
}
