/// Placeholder route for the forms listing.
///
/// Returns a static body; there is no business logic behind it yet.
pub async fn list_forms() -> &'static str {
    "forms list: no forms registered"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_forms_static_body() {
        let body = list_forms().await;
        assert_eq!(body, "forms list: no forms registered");
    }
}
