#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::{RefOr, schema::Schema};

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components are generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("{name} should be an object schema, got {other:?}"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for name in ["ErrorResponse", "HealthResponse", "GoodsView", "DashboardView", "BarcodeScanForm"] {
            assert!(components.schemas.contains_key(name), "missing schema {name}");
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_every_page_is_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/",
            "/health",
            "/login/",
            "/signup/",
            "/logout/",
            "/dashboard/",
            "/goods/",
            "/search/",
            "/edit/{id}/",
            "/delete/{id}/",
            "/categories/",
            "/categories/edit/{id}/",
            "/delete-category/{id}/",
            "/customers/",
            "/customers/edit/{id}/",
            "/customers/delete/{id}/",
            "/barcode_scanner/",
            "/barcode_retrieve/",
        ] {
            assert!(paths.contains_key(path), "{path} is not documented");
        }
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_goods_view_exposes_total_value() {
        let properties = object_properties("GoodsView");
        assert!(properties.iter().any(|p| p == "total_value"));
        assert!(properties.iter().any(|p| p == "category_name"));
    }

    #[test]
    fn test_category_form_uses_prefixed_field() {
        let properties = object_properties("CategoryForm");
        assert_eq!(properties, ["category-name"]);
    }
}
