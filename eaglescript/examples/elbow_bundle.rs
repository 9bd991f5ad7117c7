//! Route a four-trace bus around two corners and print the script.

use eaglescript::prelude::*;
use std::f64::consts::FRAC_PI_2;

fn main() -> Result<(), ScriptError> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "elbow_bundle.scr".to_string());

    let mut board = Board::new(BoardOptions {
        output: output.into(),
    });

    let mut bus = Vec::new();
    for lane in 0..4 {
        let y = lane as f64 * 0.8;
        let mut signal = board.new_signal(0.2, 1, 2)?;
        signal.add(0.0, y).add(15.0, y);
        bus.push(signal.id());
        board.add(signal)?;
    }

    // Up, tightening the bus to 0.5mm, then right again at the starting pitch.
    board
        .group(&bus)?
        .elbow(0.0, FRAC_PI_2, 10.0, Some(&[0.5, 0.5, 0.5]), 3)?;
    board
        .group(&bus)?
        .elbow(FRAC_PI_2, 0.0, 10.0, Some(&[0.8, 0.8, 0.8]), 0)?;

    let header = FootprintKind::new("1X04", "pinhead");
    board.add(header.place("J1", Orientation::rotated(90.0), (30.0, 12.0)))?;

    print!("{}", board.render());
    let path = board.draw()?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
