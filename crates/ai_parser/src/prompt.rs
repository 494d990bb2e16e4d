use engine::DEFAULT_CATEGORIES;

const OUTPUT_RULES: &str = r#"For each transaction, determine:
- amount (positive number, no currency symbols)
- description (brief, descriptive)
- category (one of: CATEGORIES)
- type ("income" or "expense")
- date (YYYY-MM-DD, only when the input states it explicitly; otherwise omit)
- confidence (0-1, how confident you are in the parsing)

Respond with a JSON object of the form {"transactions": [...]}.
If no transactions are found, respond with {"transactions": []}.

Example output:
{"transactions": [{"amount": 12.50, "description": "Lunch at Cafe", "category": "Food & Dining", "type": "expense", "confidence": 0.95}]}"#;

fn category_list() -> String {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, _, _)| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn text_system_prompt() -> String {
    format!(
        "You are a financial transaction parser. Parse the given text and extract individual transactions.\n\n{}",
        OUTPUT_RULES.replace("CATEGORIES", &category_list())
    )
}

pub(crate) fn image_system_prompt() -> String {
    format!(
        "You are a financial transaction parser. Read the attached image (a receipt, invoice, bank statement or screenshot) and extract the transactions it shows. A store receipt is usually a single expense for its total.\n\n{}",
        OUTPUT_RULES.replace("CATEGORIES", &category_list())
    )
}

pub(crate) const IMAGE_USER_PROMPT: &str = "Extract the transactions from this image.";
