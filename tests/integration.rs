use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "regicide";

#[test]
fn startup_info() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("quit\n")
            .assert()
            .success()
            .stdout(contains("regicide").and(contains("Release build"))),
    );
}

#[test]
fn starting_moves() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("position startpos\nmoves\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("b1c3 b1a3")
                    .and(contains("e2e3 e2e4"))
                    .and(contains("g1h3 g1f3")),
            ),
    );
}

#[test]
fn play_and_take_back() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("move e2e4\nd\nmove e2e4\nundo\nundo\nresult\n")
            .assert()
            .success()
            .stdout(
                contains("played e2e4")
                    .and(contains("Position: rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"))
                    .and(contains("Error: no piece on e2"))
                    .and(contains("took back e2e4"))
                    .and(contains("Error: no moves to take back"))
                    .and(contains("*")),
            ),
    );
}

#[test]
fn checkmate() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("position 7k/8/8/8/8/8/5PPP/r5K1 w\nresult\n")
            .assert()
            .success()
            .stdout(contains("0-1")),
    );
}

#[test]
fn perft_divide() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("perft 2\n")
            .assert()
            .success()
            .stdout(
                contains("e2e4: 20")
                    .and(contains("Nodes searched: 400")),
            ),
    );
}

#[test]
fn incorrect_commands() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("position 8/8 w\nperft x\nfly\n")
            .assert()
            .success()
            .stdout(
                contains("Error: incorrect position")
                    .and(contains("Error: perft depth should be a number"))
                    .and(contains("Error: unknown command: fly")),
            ),
    );
}
