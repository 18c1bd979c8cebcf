use interview_analyzer::config::AppConfig;
use interview_analyzer::generative::build_generator;
use interview_analyzer::interview::QuestionSearch;
use anyhow::Result;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let role = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    let config = AppConfig::load()?;
    let search = QuestionSearch::new(build_generator(&config)?, config.cache_ttl());

    info!("🔎 Searching interview questions for: '{}'", role);
    let questions = search.search(&role).await?;

    println!("\n=== {} INTERVIEW QUESTIONS FOR {} ===\n", questions.len(), role.to_uppercase());
    for (i, q) in questions.iter().enumerate() {
        println!("{}. [{} / {}] {}", i + 1, q.category, q.difficulty, q.question);
        if !q.answer.is_empty() {
            println!("   {}\n", q.answer.replace('\n', "\n   "));
        }
    }

    Ok(())
}
