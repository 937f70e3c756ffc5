//! Example: Build a small form with fOS Element
//!
//! Run with `RUST_LOG=fos_element=trace` to see how each option resolves.

use anyhow::Context;
use fos_element::dom::Event;
use fos_element::{Object, Options, Value, configure, default_document};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("fOS Element v{}", fos_element::VERSION);

    let input = configure(
        "input",
        &Options::new()
            .with("type", "email")
            .with("placeholder", "you@example.com")
            .with("required", true)
            .with("aria", Object::new().with("describedBy", "hint"))
            .with("data", Object::new().with("fieldId", "email")),
        &[],
    )?
    .context("input was not created")?;

    let submit = configure(
        "button",
        &Options::new()
            .with("class", "primary")
            .with("text", "Subscribe")
            .with("@click", Value::function(|event| {
                event.prevent_default();
                println!("clicked");
            })),
        &[],
    )?
    .context("button was not created")?;

    let icon = configure(
        "svg",
        &Options::new().with("width", 16).with("height", 16).with("class", "icon"),
        &[],
    )?
    .context("icon was not created")?;

    let form = configure(
        "form",
        &Options::new().with("?novalidate", 1).with("meta", Object::new().with("version", 2)),
        &[icon.into(), input.into(), submit.clone().into()],
    )?
    .context("form was not created")?;

    configure("<body", &Options::new(), &[form.into()])?.context("document has no body")?;

    let allowed = submit.dispatch_event(&mut Event::new("click", true, true));
    println!("default action allowed: {}", allowed);
    println!("{}", default_document().to_html());

    Ok(())
}
