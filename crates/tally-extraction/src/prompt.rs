//! Instruction sent to the model alongside the receipt image.

const EXTRACTION_PROMPT: &str = r#"Extract the following information from this receipt image and return it as a JSON object with exactly this structure:

{
  "date": "YYYY-MM-DD",
  "currency": "XXX",
  "vendor_name": "string",
  "receipt_items": [
    {
      "item_name": "string",
      "item_cost": 0.00
    }
  ],
  "tax": 0.00,
  "total": 0.00
}

Rules:
1. The date must be in YYYY-MM-DD format.
2. The currency must be a valid 3-letter ISO 4217 currency code (for example USD, EUR, GBP).
3. All monetary values must be numbers, not strings.
4. "tax" is the total tax for the entire receipt.
5. "item_cost" is the per-item price before tax.

Return only the JSON object. Do not include any explanation or other text."#;

/// The fixed extraction instruction. Takes no per-request input.
pub fn extraction_prompt() -> &'static str {
    EXTRACTION_PROMPT
}
