use rexpense::{
    Answer, CsvLedgerStore, ExpenseAssistant, MediaFile, OpenAIClient, OpenAIModel, RExpenseError,
    logging::{LogLevel, init_logging},
};

// Usage: cargo run --example receipt_ledger -- [receipt image] [question]
// Set REXPENSE_LOG=rexpense=debug to see request and parsing details.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogLevel::Info);

    let mut args = std::env::args().skip(1);
    let receipt = args.next();
    let question = args
        .next()
        .unwrap_or_else(|| "How much did I spend in May 2024?".to_string());

    let client = match OpenAIClient::from_env() {
        Ok(client) => client.model(OpenAIModel::Gpt4O).temperature(0.0),
        Err(e) => {
            eprintln!("⚠️  {}", e);
            eprintln!("Please set it with: export OPENAI_API_KEY=your_api_key");
            return Ok(());
        }
    };
    let assistant = ExpenseAssistant::new(client, CsvLedgerStore::new("expenses.csv"));

    if let Some(path) = receipt {
        println!("Reading receipt {}...", path);
        match assistant.ingest_receipt(MediaFile::from_path(&path)?).await {
            Ok(records) => {
                println!("Added {} line items:", records.len());
                for record in &records {
                    println!(
                        "- {} {} x{} {} ({}, {})",
                        record.date(),
                        record.item_name(),
                        record.quantity(),
                        record.price(),
                        record.category(),
                        record.payment_method()
                    );
                }
            }
            Err(e) if e.needs_resubmission() => {
                println!("Could not read the receipt, please try another photo: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n> {}", question);
    match assistant.ask(&question).await {
        Ok(Answer::Total { range, total }) => println!("You spent {} ({})", total, range),
        Ok(Answer::Text(text)) => println!("{}", text),
        Err(e @ RExpenseError::InvalidTimeRange(_)) => {
            println!("Please name a day, range, month or year: {}", e)
        }
        Err(e) if e.needs_resubmission() => println!("Please rephrase the question: {}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
