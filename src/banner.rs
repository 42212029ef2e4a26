//! Startup banner for both front ends.

use crate::engine::EngineInfo;

/// What to show in the startup banner.
pub struct BannerInfo<'a> {
    pub mode: &'a str,
    pub engine: &'a EngineInfo,
    pub auth_status: &'a str,
    /// Listen address for `serve`, `None` for chat.
    pub listen: Option<&'a str>,
}

/// Render the banner text.
pub fn banner(info: &BannerInfo) -> String {
    let mut out = format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             J A R V I S               ║
   ║      ask a question, get an answer    ║
   ╚═══════════════════════════════════════╝

   version   {}
   mode      {}
   provider  {} ({})
   auth      {}
"#,
        env!("CARGO_PKG_VERSION"),
        info.mode,
        info.engine.provider,
        info.engine.model,
        info.auth_status,
    );
    if let Some(listen) = info.listen {
        out.push_str(&format!("   listen    {listen}\n"));
    }
    out
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner(info));
}
