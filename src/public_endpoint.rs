use crate::config::AppConfig;

fn base(conf: &AppConfig) -> &str {
    conf.public_url.trim_end_matches('/')
}

/// returns the app's landing url
pub fn app_url(conf: &AppConfig) -> String {
    base(conf).to_string()
}

/// returns url of the collect page of a minted token
pub fn collect_url(conf: &AppConfig, contract: &str, token_id: &str) -> String {
    format!("{}/mint/{contract}/{token_id}", base(conf))
}

/// returns url of the share image rendered for `title`
pub fn og_image_url(conf: &AppConfig, title: &str) -> String {
    let title: String = url::form_urlencoded::byte_serialize(title.as_bytes()).collect();
    format!("{}/api/og?title={title}", base(conf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> AppConfig {
        AppConfig {
            public_url: "https://zaounz.xyz".to_string(),
        }
    }

    #[test]
    fn test_collect_url() {
        assert_eq!(
            collect_url(&endpoint(), "0xabc", "1"),
            "https://zaounz.xyz/mint/0xabc/1"
        );
    }

    #[test]
    fn test_og_url_encodes_title() {
        assert_eq!(
            og_image_url(&endpoint(), "Night Drive & Co"),
            "https://zaounz.xyz/api/og?title=Night+Drive+%26+Co"
        );
    }

    #[test]
    fn test_og_url_with_empty_title() {
        assert_eq!(og_image_url(&endpoint(), ""), "https://zaounz.xyz/api/og?title=");
    }

    #[test]
    fn test_urls_trailing_slash() {
        let conf = AppConfig {
            public_url: "https://zaounz.xyz/".to_string(),
        };

        assert_eq!(app_url(&conf), "https://zaounz.xyz");
        assert_eq!(collect_url(&conf, "0x1", "2"), "https://zaounz.xyz/mint/0x1/2");
    }
}
