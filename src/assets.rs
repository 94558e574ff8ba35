//! Static parts of the page, compiled in.

/// Editor chrome, inlined into the page head.
pub const LAYOUT_CSS: &str = include_str!("../assets/layout.css");

/// Preview, Tab key and save behaviour, inlined at the end of the body.
pub const TRYME_JS: &str = include_str!("../assets/tryme.js");

// The console overlay is served separately.
pub const CONSOLE_CSS_PATH: &str = "/tryme/console.css";
pub const CONSOLE_JS_PATH: &str = "/tryme/console.js";
pub const CONSOLE_CSS: &str = include_str!("../assets/console.css");
pub const CONSOLE_JS: &str = include_str!("../assets/console.js");

/// Id of the element the console overlay appends to.
pub const CONSOLE_PANEL_ID: &str = "console";


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_assets_fit_together() {
        assert!(CONSOLE_CSS.contains(&format!("#{CONSOLE_PANEL_ID} ")));
        assert!(CONSOLE_JS.contains(&format!("getElementById(\"{CONSOLE_PANEL_ID}\")")));
        assert!(TRYME_JS.contains("tryMeConsole.hook"));
        // inlined into a script element
        assert!(!TRYME_JS.contains("</script"));
    }
}
