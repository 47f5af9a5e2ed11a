use serde::Serialize;

/// Render a serializable response as pretty JSON.
pub fn render<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a serializable response to stdout.
pub fn output<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = render(value)?;
    println!("{rendered}");
    Ok(())
}
