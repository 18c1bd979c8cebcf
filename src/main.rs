use std::path::PathBuf;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(video) = args.next() else {
        eprintln!("Usage: interview-analyzer <video-file> [candidate-name] [user-id]");
        std::process::exit(2);
    };
    let candidate_name = args.next().unwrap_or_else(|| "Candidate".to_string());
    let user_id = match args.next().map(|id| Uuid::parse_str(&id)) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            eprintln!("Invalid user id: {}", e);
            std::process::exit(2);
        }
        None => Uuid::nil(),
    };

    match interview_analyzer::run(&PathBuf::from(video), &candidate_name, user_id).await {
        Ok(analysis) => {
            println!("\n=== Interview Analysis {} ===", analysis.id);
            println!("Interview score: {:.2}", analysis.interview_score);
            println!("Sentiment score: {:.2}", analysis.sentiment_score);
            if let Some(pauses) = &analysis.pause_analytics {
                println!("Pauses: {} (avg {:.2}s)", pauses.total_pauses, pauses.avg_pause);
            }
            println!("\n{}", analysis.feedback);
        }
        Err(e) => {
            eprintln!("Error analyzing interview: {}", e);
            std::process::exit(1);
        }
    }
}
