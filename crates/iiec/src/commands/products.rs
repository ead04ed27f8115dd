//! Store product command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use iiec_core::{Draft, Entity, EntityKind, Product, ProductDraft};

use crate::cli::{GlobalOpts, ProductFields, ProductsArgs, ProductsCommand};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "In Stock")]
    in_stock: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            price: format!("{:.2}", p.price),
            in_stock: if p.in_stock { "yes" } else { "no" }.into(),
            description: output::truncate(&p.description, 40),
        }
    }
}

fn detail(p: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", p.id);
    let _ = writeln!(out, "Name:        {}", p.name);
    let _ = writeln!(out, "Price:       {:.2}", p.price);
    let _ = writeln!(out, "In stock:    {}", if p.in_stock { "yes" } else { "no" });
    if p.sync.is_local_only() {
        let _ = writeln!(out, "Sync:        local only");
    }
    if !p.description.is_empty() {
        let _ = writeln!(out, "Description: {}", p.description);
    }
    if !p.image_url.is_empty() {
        let _ = writeln!(out, "Image:       {}", p.image_url);
    }
    out.trim_end().to_owned()
}

// ── Drafts ──────────────────────────────────────────────────────────

fn base_draft(fields: &ProductFields, current: ProductDraft) -> Result<ProductDraft, CliError> {
    let mut draft: ProductDraft = match fields.from_file {
        Some(ref path) => serde_json::from_value(util::read_json_file(path)?)?,
        None => current,
    };
    util::set_if(&mut draft.name, fields.name.as_ref());
    util::set_if(&mut draft.description, fields.description.as_ref());
    util::set_if(&mut draft.price, fields.price.as_ref());
    util::set_if(&mut draft.in_stock, fields.in_stock.as_ref());
    util::set_if(&mut draft.image_url, fields.image_url.as_ref());

    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(CliError::Validation {
            field: "price".into(),
            reason: format!("must be a non-negative number, got {}", draft.price),
        });
    }
    Ok(draft)
}

fn save_result(
    outcome: iiec_core::SaveOutcome<Entity>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::finish_save(
        outcome,
        "product",
        global,
        |e| e.as_product().map(detail).unwrap_or_default(),
        |e| e.id().to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List => {
            let items = util::load(conn, EntityKind::Products).await?;
            let products: Vec<Product> =
                items.iter().filter_map(Entity::as_product).cloned().collect();
            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create(fields) => {
            let draft = base_draft(&fields, ProductDraft::default())?;
            if draft.name.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "a product needs a name (--name or --from-file)".into(),
                });
            }
            let outcome = conn.client.save(&Draft::Product(draft), None).await?;
            save_result(outcome, global)
        }

        ProductsCommand::Update { id, fields } => {
            let current = util::load_one(conn, EntityKind::Products, id).await?;
            let current = current.as_product().map(ProductDraft::from).unwrap_or_default();
            let draft = base_draft(&fields, current)?;
            let outcome = conn.client.save(&Draft::Product(draft), Some(id)).await?;
            save_result(outcome, global)
        }

        ProductsCommand::Delete { id } => {
            let outcome = conn
                .client
                .remove(EntityKind::Products, id, &util::Prompter::new(global))
                .await?;
            util::finish_remove(outcome, "product", global)
        }
    }
}
