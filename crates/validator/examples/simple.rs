//! Validates a nested record whose inner links are optional.
//!
//! Run with `RUST_LOG=ruletag=trace` to watch the walk.

use ruletag::{Context, Record, Validator};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Record)]
struct Order {
    #[rule("required && len(8)")]
    id: String,
    #[rule("required && email")]
    customer: String,
    shipping: Option<Box<Shipping>>,
}

#[derive(Record)]
struct Shipping {
    #[rule("non-zero")]
    street: String,
    #[rule("if(non-zero)then(len(5))")]
    zip: Option<String>,
    recipient: Option<Box<Recipient>>,
}

#[derive(Record)]
struct Recipient {
    #[rule("non-nil")]
    phone: Option<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let validator = Validator::new();
    let ctx = Context::background();

    let orders = [
        (
            "complete",
            Order {
                id: "ORD-0001".into(),
                customer: "test@test.com".into(),
                shipping: Some(Box::new(Shipping {
                    street: "Main Street 1".into(),
                    zip: Some("10115".into()),
                    recipient: Some(Box::new(Recipient {
                        phone: Some("+491234567890".into()),
                    })),
                })),
            },
        ),
        (
            "no shipping",
            Order {
                id: "ORD-0002".into(),
                customer: "test@test.com".into(),
                shipping: None,
            },
        ),
        (
            "bad customer",
            Order {
                id: "ORD-0003".into(),
                customer: "1234".into(),
                shipping: None,
            },
        ),
    ];

    for (name, order) in &orders {
        match validator.validate(&ctx, order) {
            Ok(()) => println!("{name}: valid"),
            Err(e) => println!("{name}: {e}"),
        }
    }
}
