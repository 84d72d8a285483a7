use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridmdp::{solve, Action, GridMdp, Policy, PolicyIterationConfig};

fn arrow(action: Option<Action>) -> char {
    match action {
        Some(Action::Right) => '>',
        Some(Action::Left) => '<',
        Some(Action::Up) => '^',
        Some(Action::Down) => 'v',
        None => '?',
    }
}

fn main() -> gridmdp::Result<()> {
    let mdp = GridMdp::new(4, 4, 15, vec![], 0.9)?;
    let initial = Policy::random(mdp.num_states(), &mut ChaCha8Rng::seed_from_u64(17));
    let result = solve(&mdp, &initial, &PolicyIterationConfig::default())?;

    println!("4x4 grid world, goal at state 15, discount 0.9");
    println!(
        "policy stable after {} improvement steps",
        result.improvements
    );

    println!("\nstate values:");
    let spec = mdp.spec();
    for row in 0..spec.rows() {
        let mut line = String::new();
        for col in 0..spec.cols() {
            let value = result.values.get(spec.state_at(row, col));
            line.push_str(&format!("{:>6.1}", value));
        }
        println!("{}", line);
    }

    println!("\ngreedy policy:");
    for row in 0..spec.rows() {
        let mut line = String::new();
        for col in 0..spec.cols() {
            let state = spec.state_at(row, col);
            let mark = if state == mdp.goal() {
                'G'
            } else {
                arrow(result.policy.action(state))
            };
            line.push(' ');
            line.push(mark);
        }
        println!("{}", line);
    }

    Ok(())
}
