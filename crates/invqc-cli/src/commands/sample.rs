//! Sample command - emit demo invoice data.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;

/// Arguments for the sample command.
#[derive(Args)]
pub struct SampleArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SampleArgs) -> anyhow::Result<()> {
    // One clean invoice, one incomplete, one with a math error, one duplicate.
    let invoices = json!([
        {
            "invoice_number": "INV-001",
            "invoice_date": "2023-10-27",
            "vendor_name": "Acme",
            "vendor_tax_id": "US123",
            "vendor_address": "1 Main St",
            "currency": "USD",
            "total_net_amount": "1000.00",
            "total_tax_amount": "150.00",
            "total_amount_due": "1150.00",
            "line_items": [
                {"description": "Widgets", "quantity": "10", "unit_price": "100.00", "line_total": "1000.00"}
            ]
        },
        {
            "invoice_number": "INV-002",
            "invoice_date": "2023-10-28",
            "total_amount_due": "500.00"
        },
        {
            "invoice_number": "INV-003",
            "invoice_date": "2023-10-29",
            "vendor_name": "Beta Corp",
            "vendor_tax_id": "US456",
            "total_net_amount": "80.00",
            "total_tax_amount": "10.00",
            "total_amount_due": "100.00",
            "line_items": [
                {"description": "Gadget", "quantity": "1", "unit_price": "80.00", "line_total": "80.00"}
            ]
        },
        {
            "invoice_number": "INV-001",
            "invoice_date": "2023-10-27",
            "vendor_name": "Acme",
            "vendor_tax_id": "US123",
            "total_amount_due": "1150.00",
            "line_items": [
                {"description": "Widgets", "quantity": "10", "unit_price": "100.00", "line_total": "1000.00"}
            ]
        }
    ]);

    let content = serde_json::to_string_pretty(&invoices)?;
    match &args.output {
        Some(path) => {
            fs::write(path, content)?;
            println!(
                "{} Sample invoices written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
