use std::collections::HashMap;
use std::sync::Arc;

use chaos_gacha::{
    Catalog, Category, GachaEngine, GachaSession, MemoryStore, PreferenceKey, RollSource, Ticket,
    TicketPreset,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = GachaEngine::new(Arc::new(Catalog::bundled()?), Arc::new(MemoryStore::new()));
    let session = GachaSession::new(engine);
    let mut rng = rand::rng();

    for &ticket in Ticket::ALL {
        let levels = ticket.levels();
        println!(
            "{ticket: <10} {} min {:.1} ave {:.1} max {:.1}",
            ticket.color(),
            levels.min,
            levels.ave,
            levels.max
        );
    }

    session.set_category(Category::Items);
    session.apply_ticket(Ticket::Golden);
    let outcome = session.roll(&mut rng).await?;
    println!("\n{}\n", outcome.item.share_text());

    session
        .engine()
        .preferences()
        .set_flag(PreferenceKey::ExcludeTechDrops, true)
        .await?;
    let status = session.engine().preferences().filter_status().await;
    if let Some(summary) = status.summary() {
        println!("{summary}");
    }

    session.set_category(Category::Random);
    session.apply_ticket(Ticket::Divine);
    let mut sources: HashMap<RollSource, u64> = HashMap::default();
    for _ in 0..250 {
        let outcome = session.roll(&mut rng).await?;
        *sources.entry(outcome.source).or_insert(0) += 1;
    }

    println!(
        "{} rolls kept, average rarity {:.1}",
        session.total_rolls(),
        session.average_rarity()
    );
    for (source, count) in sources {
        println!("{count: >5} {source:?}");
    }
    for entry in session.history().iter().take(5) {
        println!(
            "{} {} ({}) {:.1}",
            entry.timestamp.format("%H:%M:%S"),
            entry.item.title,
            entry.item.category.display_name(),
            entry.rarity
        );
    }

    Ok(())
}
