use std::env;
use std::io::{self, Write};

fn banner_text(suffix: &str) -> String {
    let no_color = env::var("NO_COLOR").is_ok();
    let (c, r) = if no_color {
        ("", "")
    } else {
        ("\x1b[96m", "\x1b[0m")
    };
    let logo = concat!(
        "             _                    _   _     \n",
        "  _ __  __ _| |_ _ __ ___   __ _| |_| |__  \n",
        " | '_ \\/ _` | __| '_ ` _ \\ / _` | __| '_ \\ \n",
        " | | | (_| | |_| | | | | | (_| | |_| | | |\n",
        " |_| |_\\__,_|\\__|_| |_| |_|\\__,_|\\__|_| |_|\n",
    );
    format!("\n{c}{logo}{r}∑ {suffix}\n")
}

pub fn print_banner() {
    let _ = io::stdout()
        .write_all(banner_text("natmath – type math or ask in words").as_bytes());
}

pub fn print_server_banner() {
    let _ = io::stdout().write_all(banner_text("natmath API – POST /api/eval").as_bytes());
}

#[cfg(test)]
mod tests {
    use super::banner_text;

    #[test]
    fn banner_carries_suffix() {
        assert!(banner_text("hello").contains("hello"));
    }
}
