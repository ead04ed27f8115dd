//! Store order command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use iiec_core::{Order, OrderRequest};

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.to_string(),
            date: output::date_cell(o.order_date.as_ref()),
            customer: o.full_name.clone(),
            email: o.email.clone(),
            product: o.product_title.clone(),
            quantity: o.quantity,
            total: format!("{:.2}", o.total_amount),
        }
    }
}

fn detail(o: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order:    {}", o.id);
    let _ = writeln!(out, "Product:  {} x{}", o.product_title, o.quantity);
    let _ = writeln!(out, "Total:    {:.2}", o.total_amount);
    let _ = writeln!(out, "Customer: {} <{}>", o.full_name, o.email);
    let _ = writeln!(out, "Contact:  {}", o.contact);
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OrdersCommand::List => {
            let orders = conn.client.list_orders().await?;
            let out = output::render_list(
                &global.output,
                &orders,
                |o| OrderRow::from(o),
                |o| o.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Place {
            product,
            price,
            quantity,
            name,
            email,
            contact,
        } => {
            let request = OrderRequest {
                full_name: name,
                email,
                contact,
                product_title: product,
                unit_price: price,
                quantity,
            };
            let order = conn.client.place_order(&request).await?;
            let out = output::render_single(&global.output, &order, detail, |o| o.id.to_string())?;
            output::print_output(&out, global.quiet);
            if !global.quiet {
                let color = output::should_color(&global.color);
                eprintln!("{}", output::success("Order placed", color));
            }
            Ok(())
        }
    }
}
