use maud::{html, Markup, DOCTYPE};

use crate::storage::models::MediaKind;

const MEDIA_STYLE: &str =
    "-webkit-user-select: none;margin: auto;box-shadow: 0 0 5px rgb(0, 0, 0, 0.5);";

const DOWNLOAD_STYLE: &str = "appearance: none; background: white; color: black; \
     padding: 10px; border: none; border-radius: 50px; font-size: .9rem; \
     cursor: pointer; text-decoration: none; display: inline-block;";

/// Rich preview page: Twitter/Open Graph meta tags, oEmbed discovery and an inline viewer.
#[derive(Debug, Clone)]
pub struct EmbedPage<'a> {
    pub file_url: &'a str,
    pub oembed_url: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub kind: MediaKind,
    pub username: &'a str,
    pub filename: &'a str,
    pub size: &'a str,
    pub site_name: &'a str,
    pub stylesheet_url: Option<&'a str>,
}

impl EmbedPage<'_> {
    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    title { (self.username) " on " (self.site_name) }
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no";
                    meta http-equiv="x-ua-compatible" content="ie=edge";
                    (self.card_meta())
                    meta name="theme-color" content=(self.color);
                    link type="application/json+oembed" href=(self.oembed_url);
                    @if let Some(stylesheet) = self.stylesheet_url {
                        link rel="stylesheet" href=(stylesheet);
                    }
                }
                body {
                    center {
                        div class="vertical-center" {
                            (self.viewer())
                            h5 { "Uploaded by: " span class="info" { (self.username) } }
                        }
                    }
                }
            }
        }
    }

    fn card_meta(&self) -> Markup {
        html! {
            @if self.kind.is_image() {
                meta name="twitter:card" content="summary_large_image";
                meta property="og:image" content=(self.file_url);
                meta property="og:description" content=(self.description);
            } @else {
                meta name="twitter:card" content="player";
                meta name="twitter:player" content=(self.file_url);
            }
        }
    }

    fn viewer(&self) -> Markup {
        html! {
            @match self.kind {
                MediaKind::Image => {
                    img style=(MEDIA_STYLE) src=(self.file_url);
                }
                MediaKind::Video => {
                    video style=(MEDIA_STYLE) controls autoplay {
                        source src=(self.file_url);
                        "Your browser does not support this video tag."
                    }
                }
                MediaKind::Other => {
                    h3 {
                        (self.filename)
                        " (" span class="info" { (self.size) } ")"
                    }
                    a class="download" href=(self.file_url) style=(DOWNLOAD_STYLE) { "Download" }
                }
            }
        }
    }
}
