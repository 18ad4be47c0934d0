//! End-to-end flow: itemize receipts into the ledger and answer spending
//! questions from it.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::backend::{InferenceProvider, MediaFile};
use crate::error::Result;
use crate::extraction::{ExtractionOutcome, ExtractionRequest, Extractor};
use crate::ledger::{CsvLedgerStore, ExpenseRecord};
use crate::query::{TimeRangeArgs, TimeRangeSpec, total_expenses};
use crate::schema::{ToolChoice, ToolSchema};

/// System instructions for answering spending questions.
pub const QUERY_INSTRUCTIONS: &str = "You help the user understand their spending. \
When the user asks how much they spent over some period, call get_total_expenses \
with exactly one of specific_date, date_range, month_year or year. Dates use the \
YYYY-MM-DD format. Otherwise answer briefly in plain text.";

/// Reply to a spending question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// The model asked for a total and it was computed from the ledger
    Total { range: TimeRangeSpec, total: Decimal },
    /// The model answered directly
    Text(String),
}

/// Couples an [`Extractor`] with a [`CsvLedgerStore`].
pub struct ExpenseAssistant<P> {
    extractor: Extractor<P>,
    store: CsvLedgerStore,
}

impl<P: InferenceProvider> ExpenseAssistant<P> {
    pub fn new(provider: P, store: CsvLedgerStore) -> Self {
        Self {
            extractor: Extractor::new(provider),
            store,
        }
    }

    pub fn extractor(&self) -> &Extractor<P> {
        &self.extractor
    }

    pub fn store(&self) -> &CsvLedgerStore {
        &self.store
    }

    /// Itemize a receipt image and append its line items to the ledger.
    ///
    /// Nothing is written when extraction fails.
    #[instrument(skip(self, image), fields(path = %self.store.path().display()))]
    pub async fn ingest_receipt(&self, image: MediaFile) -> Result<Vec<ExpenseRecord>> {
        let records = self.extractor.extract_receipt(image).await?;
        self.store.append(records.iter().cloned())?;
        info!(added = records.len(), "Receipt added to ledger");
        Ok(records)
    }

    /// Answer a spending question, computing totals from the ledger when the
    /// model asks for one.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let request = ExtractionRequest::new(QUERY_INSTRUCTIONS, question)
            .tool(ToolSchema::for_type::<TimeRangeArgs>())
            .tool_choice(ToolChoice::Auto);

        match self.extractor.extract(&request).await?.outcome {
            ExtractionOutcome::PlainText(text) => Ok(Answer::Text(text)),
            ExtractionOutcome::ToolInvocation { arguments, .. } => {
                let range = TimeRangeSpec::from_arguments(&arguments)?;
                let ledger = self.store.load()?;
                let total = total_expenses(&range, ledger.records())?;
                info!(range = %range, total = %total, "Answered spending question");
                Ok(Answer::Total { range, total })
            }
        }
    }
}
