use chess_core::config::EngineConfig;
use chess_core::engine::game::Game;
use chess_core::engine::types::{Color, GameStatus};

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info".into()),
        )
        .init();

    let config = EngineConfig::from_env();
    if let Err(e) = run(&config) {
        tracing::error!(%e, "self-play aborted");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(config: &EngineConfig) -> Result<(), chess_core::engine::types::ChessError> {
    let mut game = Game::from_fen_or_default(&config.start_fen)?;
    let white = config.white();
    let black = config.black();

    tracing::info!(
        "chess-selfplay v{} starting: {white} (white) vs {black} (black) from {}",
        env!("CARGO_PKG_VERSION"),
        game.starting_fen()
    );

    while !game.is_game_over() && game.ply_count() < config.max_plies {
        let color = game.side_to_move();
        let player = match color {
            Color::White => white,
            Color::Black => black,
        };
        let mv = player.choose_move(game.position(), color)?;
        let status = game.play(mv)?;
        tracing::info!(
            ply = game.ply_count(),
            %color,
            %player,
            mv = %mv,
            %status,
            "ply"
        );
    }

    let result = match game.status() {
        GameStatus::Checkmate => match game.winner() {
            Some(Color::White) => "1-0",
            _ => "0-1",
        },
        GameStatus::NoLegalMoves => "no legal moves",
        _ => "unfinished (ply limit)",
    };

    let line: Vec<String> = game.history().iter().map(|r| r.notation.clone()).collect();
    println!("{}", line.join(" "));
    println!("{}", game.to_fen());
    println!("result: {result} after {} plies", game.ply_count());
    Ok(())
}
