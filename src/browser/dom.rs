//! DOM access layer.
//!
//! Owns the page and exposes the few capabilities the workflow needs:
//! enumerate a select's options, select by value or label, query the
//! selected value, and probe/read elements by XPath. Everything goes through
//! `Page::evaluate`; interpolated strings are JSON-escaped so labels with
//! quotes cannot break the script.

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{HarvestError, Result};
use crate::records::AirportOption;

pub struct Dom {
    page: Page,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    value: String,
    label: String,
}

impl Dom {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn eval(&self, js: String) -> Result<JsonValue> {
        let result = self.page.evaluate(js).await?;
        Ok(result.into_value()?)
    }

    async fn eval_as<T: DeserializeOwned>(&self, js: String) -> Result<T> {
        let value = self.eval(js).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Snapshot all options of the select with the given element id,
    /// in document order, sentinel included.
    pub async fn select_options(&self, select_id: &str) -> Result<Vec<AirportOption>> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s) return null;
                return Array.from(s.options).map(o => ({{ value: o.value, label: o.text }}));
            }})()"#,
            id = js_str(select_id),
        );
        let raw: Option<Vec<RawOption>> = self.eval_as(js).await?;
        let raw = raw.ok_or_else(|| HarvestError::element_not_found(format!("#{}", select_id)))?;
        Ok(raw
            .into_iter()
            .map(|o| AirportOption {
                value: o.value,
                label: o.label.trim().to_string(),
            })
            .collect())
    }

    /// Does the select currently offer an option with this visible label?
    pub async fn has_option_with_label(&self, select_id: &str, label: &str) -> Result<bool> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s) return false;
                return Array.from(s.options).some(o => o.text === {label});
            }})()"#,
            id = js_str(select_id),
            label = js_str(label),
        );
        self.eval_as(js).await
    }

    /// Does the select currently offer an option with this underlying value?
    pub async fn has_option_with_value(&self, select_id: &str, value: &str) -> Result<bool> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s) return false;
                return Array.from(s.options).some(o => o.value === {value});
            }})()"#,
            id = js_str(select_id),
            value = js_str(value),
        );
        self.eval_as(js).await
    }

    /// Select an option by visible label and fire the change event so the
    /// site's own handlers (the AJAX airport load) run.
    pub async fn select_by_label(&self, select_id: &str, label: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s) return false;
                const opt = Array.from(s.options).find(o => o.text === {label});
                if (!opt) return false;
                s.value = opt.value;
                s.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            id = js_str(select_id),
            label = js_str(label),
        );
        let ok: bool = self.eval_as(js).await?;
        if !ok {
            return Err(HarvestError::element_not_found(format!(
                "#{} option with label '{}'",
                select_id, label
            )));
        }
        Ok(())
    }

    /// Select an option by underlying value (labels can be ambiguous).
    pub async fn select_by_value(&self, select_id: &str, value: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s) return false;
                const opt = Array.from(s.options).find(o => o.value === {value});
                if (!opt) return false;
                s.value = opt.value;
                s.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            id = js_str(select_id),
            value = js_str(value),
        );
        let ok: bool = self.eval_as(js).await?;
        if !ok {
            return Err(HarvestError::element_not_found(format!(
                "#{} option with value '{}'",
                select_id, value
            )));
        }
        Ok(())
    }

    /// The value the page itself currently reports as selected.
    pub async fn selected_value(&self, select_id: &str) -> Result<Option<String>> {
        let js = format!(
            r#"(() => {{
                const s = document.getElementById({id});
                if (!s || s.selectedIndex < 0) return null;
                return s.options[s.selectedIndex].value;
            }})()"#,
            id = js_str(select_id),
        );
        self.eval_as(js).await
    }

    /// Is any element matched by the XPath currently in the document?
    pub async fn xpath_present(&self, xpath: &str) -> Result<bool> {
        let js = format!(
            r#"(() => {{
                const r = document.evaluate({xpath}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null);
                return r.singleNodeValue !== null;
            }})()"#,
            xpath = js_str(xpath),
        );
        self.eval_as(js).await
    }

    /// Text content of the first XPath match, or `None` if nothing matches.
    pub async fn xpath_text(&self, xpath: &str) -> Result<Option<String>> {
        let js = format!(
            r#"(() => {{
                const r = document.evaluate({xpath}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null);
                const node = r.singleNodeValue;
                return node === null ? null : node.textContent;
            }})()"#,
            xpath = js_str(xpath),
        );
        self.eval_as(js).await
    }

    /// Click the first XPath match.
    pub async fn xpath_click(&self, xpath: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const r = document.evaluate({xpath}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null);
                const node = r.singleNodeValue;
                if (node === null) return false;
                node.click();
                return true;
            }})()"#,
            xpath = js_str(xpath),
        );
        let ok: bool = self.eval_as(js).await?;
        if !ok {
            return Err(HarvestError::element_not_found(xpath));
        }
        Ok(())
    }

    /// Fill an input located by its `name` attribute, clearing it first.
    pub async fn fill_input_by_name(&self, name: &str, value: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.getElementsByName({name})[0];
                if (!el) return false;
                el.value = '';
                el.value = {value};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()"#,
            name = js_str(name),
            value = js_str(value),
        );
        let ok: bool = self.eval_as(js).await?;
        if !ok {
            return Err(HarvestError::element_not_found(format!("[name='{}']", name)));
        }
        Ok(())
    }

    /// Click the first element with the given `name` attribute.
    pub async fn click_by_name(&self, name: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.getElementsByName({name})[0];
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            name = js_str(name),
        );
        let ok: bool = self.eval_as(js).await?;
        if !ok {
            return Err(HarvestError::element_not_found(format!("[name='{}']", name)));
        }
        Ok(())
    }
}

/// Quote a Rust string as a JS string literal.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_str_escapes_quotes() {
        assert_eq!(js_str(r#"O'Hare "ORD""#), r#""O'Hare \"ORD\"""#);
    }

    #[test]
    fn js_str_plain() {
        assert_eq!(js_str("arrive_sel_apt"), "\"arrive_sel_apt\"");
    }
}
