use crate::config::Config;
use crate::posts::{PostStore, page_count};

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.trim().is_empty() => "configured",
        _ => "(unset)",
    }
}

pub fn render_status(config: &Config, store: &PostStore) -> String {
    let posts = store.posts();
    let saved = posts.data.len();

    let mut lines = vec![
        "◆ smartblog status".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Config      {}", config.config_path.display()),
        format!("Data        {}", config.data_dir.display()),
        String::new(),
        format!("Model       {}", config.default_model),
        format!("Temperature {:.2}", config.default_temperature),
        format!("Gemini key  {}", mask(config.api_key.as_deref())),
        format!("GitHub      {}", config.github.api_base),
        format!("  token     {}", mask(config.github.token.as_deref())),
        format!(
            "  owner     {}",
            config.github.default_owner.as_deref().unwrap_or("(unset)")
        ),
        format!(
            "Gateway     http://{}:{}",
            config.gateway.host, config.gateway.port
        ),
        format!("Client API  {}", config.client.api_base),
        String::new(),
        format!(
            "Posts       {saved} saved, {} page(s) of {}",
            page_count(saved, config.store.page_size),
            config.store.page_size
        ),
    ];
    if let Some(error) = posts.error {
        lines.push(format!("  error     {error}"));
    }
    lines.join("\n")
}
