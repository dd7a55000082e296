//! `fs-cli clients`

use fixedscope_proxy::clients::ClientDirectory;

/// List clients that have a store URL configured.
#[must_use]
pub fn list() -> String {
    render(&ClientDirectory::from_env())
}

fn render(directory: &ClientDirectory) -> String {
    let clients = directory.configured_clients();

    if clients.is_empty() {
        return "No clients configured (expected {CLIENT}_STORE_URL variables)".to_string();
    }

    clients
        .iter()
        .map(|client| match directory.resolve(client) {
            Ok(config) => format!("{client}\t{}", config.store_origin),
            Err(e) => format!("{client}\tincomplete: {e}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_clients_with_status() {
        let directory = ClientDirectory::from_vars([
            ("GLOBEX_STORE_URL", "globex.myshopify.com"),
            ("ACME_STORE_URL", "acme.myshopify.com"),
            ("ACME_CLIENT_ID", "acme-client"),
            ("ACME_CLIENT_SECRET", "acme-secret"),
        ]);

        let output = render(&directory);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first(), Some(&"acme\thttps://acme.myshopify.com"));
        assert!(lines.get(1).is_some_and(|l| l.starts_with("globex\tincomplete:")));
        assert!(!output.contains("acme-secret"));
    }

    #[test]
    fn test_render_empty_directory() {
        let output = render(&ClientDirectory::default());
        assert!(output.starts_with("No clients configured"));
    }
}
