use crate::board::{Board, Color, PieceKind};

/// Neither side can possibly deliver mate: bare kings, a single minor
/// piece, or only bishops that all stand on one square color.
pub(crate) fn is_insufficient_material(board: &Board) -> bool {
    let mut knights = 0;
    let mut bishops_on_dark = 0;
    let mut bishops_on_light = 0;

    for (sq, piece) in board.occupied() {
        match piece.kind() {
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => knights += 1,
            PieceKind::Bishop if sq.is_dark() => bishops_on_dark += 1,
            PieceKind::Bishop => bishops_on_light += 1,
            PieceKind::King => {}
        }
    }

    let minors = knights + bishops_on_dark + bishops_on_light;
    if minors <= 1 {
        return true;
    }
    knights == 0 && (bishops_on_dark == 0 || bishops_on_light == 0) && each_side_has_one_bishop(board)
}

fn each_side_has_one_bishop(board: &Board) -> bool {
    Color::BOTH.iter().all(|&color| {
        board
            .pieces(color)
            .filter(|(_, p)| p.kind() == PieceKind::Bishop)
            .count()
            == 1
    })
}
