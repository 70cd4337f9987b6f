use maud::{html, Markup, DOCTYPE};

/// Minimal page exposing only an image preview of the file.
#[derive(Debug, Clone)]
pub struct ShowLinkPage<'a> {
    pub file_url: &'a str,
}

impl ShowLinkPage<'_> {
    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta name="twitter:card" content="summary_large_image";
                    meta property="og:image" content=(self.file_url);
                }
                body style="margin: 0px; background: #212121; height: 100%; display: flex; align-items: center" {
                    img width="500px" style="-webkit-user-select: none;margin: auto;" src=(self.file_url);
                }
            }
        }
    }
}
