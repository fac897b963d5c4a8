use std::io;

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Hands `url` to the system browser without waiting for it.
pub fn open_url(url: &str) -> io::Result<()> {
    if !is_web_url(url) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to open non-web url {url:?}"),
        ));
    }
    open::that_detached(url)
}
