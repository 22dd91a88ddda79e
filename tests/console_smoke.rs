use std::io::Write;
use std::process::{Command, Stdio};

#[test]
fn console_two_player_smoke_test() {
    let exe = env!("CARGO_BIN_EXE_chess_arbiter");
    let mut child = Command::new(exe)
        .env("CHESS_ENGINE_SIDE", "none")
        .env("CHESS_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn console binary");

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(b"f2f3\ne7e5\ne2e5\ng2g4\nmoves g8\nd8h4\nfen\nquit\n")
        .unwrap();
    drop(stdin);

    let output = child.wait_with_output().expect("console did not exit");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);

    assert!(text.contains("White played f2f3"), "{text}");
    assert!(text.contains("Illegal move"), "{text}");
    let knight_moves = text
        .lines()
        .find(|line| line.contains("g8f6"))
        .expect("legal moves of the g8 knight were listed");
    for target in ["g8e7", "g8h6"] {
        assert!(knight_moves.contains(target), "{knight_moves}");
    }
    assert!(text.contains("White is in check"), "{text}");
    assert!(text.contains("Game over: Black wins by checkmate"), "{text}");
    assert!(
        text.contains("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
        "{text}"
    );
}
