use clap::Args;
use trolley_app::{
    context::AppContext,
    domain::carts::{
        CartsService,
        models::{CartUuid, CartView},
    },
};
use uuid::Uuid;

use crate::cli::ConnectionArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Cart UUID
    #[arg(long)]
    cart: Uuid,
}

pub(crate) async fn run(args: ShowArgs) -> Result<(), String> {
    let db = args.connection.connect().await?;
    let context = AppContext::new(db.clone());

    let view = context
        .carts
        .view_cart(CartUuid::from_uuid(args.cart))
        .await
        .map_err(|error| format!("failed to load cart: {error}"));

    db.close().await;

    match view? {
        Some(view) => print_cart(&view),
        None => return Err(format!("cart {} not found", args.cart)),
    }

    Ok(())
}

fn print_cart(view: &CartView) {
    println!("cart_uuid: {}", view.cart.uuid);
    println!("user_uuid: {}", view.cart.user_uuid);
    println!("status: {}", view.cart.status);
    println!("updated_at: {}", view.cart.updated_at);

    for line in &view.items {
        println!(
            "{}  {} x {} @ {} = {}",
            line.product_uuid,
            line.quantity,
            line.product_name,
            line.price,
            line.total()
        );
    }

    println!("subtotal: {}", view.subtotal());
}
