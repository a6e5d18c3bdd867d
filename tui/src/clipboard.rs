use anyhow::Context;

pub(crate) fn copy(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("failed to open system clipboard")?;
    clipboard
        .set_text(text)
        .context("failed to write to system clipboard")?;
    Ok(())
}
