#[cfg(test)]
mod integration_tests {
    use crate::handlers::barcode::{PRODUCT_ADDED, PRODUCT_NOT_FOUND};
    use crate::schemas::ApiResponse;
    use crate::services::accounts::USERNAME_TAKEN;
    use crate::test_utils::test_utils::{
        init_test_tracing, login_as, logout, setup_test_app, setup_test_server, signup_as,
    };
    use axum::http::StatusCode;
    use axum_test::{TestResponse, TestServer};
    use serde_json::Value;

    fn location(response: &TestResponse) -> String {
        response
            .header("location")
            .to_str()
            .expect("location header is ASCII")
            .to_string()
    }

    fn data(response: &TestResponse) -> Value {
        let body: ApiResponse<Value> = response.json();
        body.data
    }

    async fn dashboard(server: &TestServer) -> Value {
        let response = server.get("/dashboard/").await;
        response.assert_status(StatusCode::OK);
        data(&response)
    }

    async fn add_category(server: &TestServer, name: &str) -> i64 {
        server
            .post("/dashboard/")
            .form(&[("submit_category", ""), ("category-name", name)])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let page = dashboard(server).await;
        page["categories"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == name)
            .and_then(|c| c["id"].as_i64())
            .expect("category listed on the dashboard")
    }

    async fn add_customer(server: &TestServer, name: &str, email: &str) -> i64 {
        server
            .post("/dashboard/")
            .form(&[("submit_customer", ""), ("name", name), ("email", email), ("phone", "09171234567")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let page = dashboard(server).await;
        page["customers"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == name)
            .and_then(|c| c["id"].as_i64())
            .expect("customer listed on the dashboard")
    }

    async fn add_good(server: &TestServer, fields: &[(&str, &str)]) {
        let mut form = vec![("submit_good", "")];
        form.extend_from_slice(fields);
        server
            .post("/dashboard/")
            .form(&form)
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status(StatusCode::OK);
        let document: Value = response.json();
        assert!(document["paths"]["/dashboard/"].is_object());
        assert!(document["paths"]["/barcode_retrieve/"].is_object());
    }

    #[tokio::test]
    async fn test_anonymous_requests_redirect_to_login() {
        let _guard = init_test_tracing();
        let server = setup_test_server().await;

        let response = server.get("/dashboard/").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login/?next=%2Fdashboard%2F");

        let response = server.get("/search/").add_query_param("q", "cola").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login/?next=%2Fsearch%2F%3Fq%3Dcola");

        for path in ["/goods/", "/categories/", "/customers/", "/barcode_scanner/", "/barcode_retrieve/", "/categories/edit/1/"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::SEE_OTHER);
            assert!(location(&response).starts_with("/login/?next="), "{path} is not protected");
        }

        let response = server.post("/delete-category/1/").await;
        response.assert_status(StatusCode::SEE_OTHER);
        let response = server.post("/delete/1/").await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_home_reports_authentication() {
        let server = setup_test_server().await;

        let anonymous = data(&server.get("/").await);
        assert_eq!(anonymous["authenticated"], false);

        signup_as(&server, "alice").await;
        let home = data(&server.get("/").await);
        assert_eq!(home["authenticated"], true);
        assert_eq!(home["username"], "alice");
    }

    #[tokio::test]
    async fn test_signup_login_and_logout() {
        let _guard = init_test_tracing();
        let server = setup_test_server().await;

        let response = server
            .post("/signup/")
            .form(&[("username", "alice"), ("email", "alice@example.com"), ("password", "pw")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard/");
        assert_eq!(dashboard(&server).await["username"], "alice");

        logout(&server).await;
        server.get("/dashboard/").await.assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post("/login/")
            .form(&[("username", "alice"), ("password", "wrong"), ("next", "/goods/")])
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let view = data(&response);
        assert_eq!(view["error"], "Invalid credentials");
        assert_eq!(view["next"], "/goods/");

        let response = server
            .post("/login/")
            .form(&[("username", "alice"), ("password", "pw"), ("next", "/goods/")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/goods/");
        server.get("/goods/").await.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_ignores_offsite_next() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        logout(&server).await;

        let response = server
            .post("/login/")
            .form(&[
                ("username", "alice"),
                ("password", crate::test_utils::test_utils::TEST_PASSWORD),
                ("next", "https://evil.example/"),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard/");
    }

    #[tokio::test]
    async fn test_signup_errors_are_reported_per_field() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        logout(&server).await;

        let response = server
            .post("/signup/")
            .form(&[("username", "carol"), ("email", "nope"), ("password", "")])
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let view = data(&response);
        assert_eq!(view["errors"]["email"][0], "Enter a valid email address.");
        assert_eq!(view["errors"]["password"][0], "This field is required.");
        assert_eq!(view["username"], "carol");

        let response = server
            .post("/signup/")
            .form(&[("username", "alice"), ("email", "other@example.com"), ("password", "pw")])
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(data(&response)["errors"]["username"][0], USERNAME_TAKEN);
    }

    #[tokio::test]
    async fn test_inventory_scenario_is_isolated_per_user() {
        let _guard = init_test_tracing();
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        let beverages = add_category(&server, "Beverages").await.to_string();
        let jane = add_customer(&server, "Jane", "jane@gmail.com").await.to_string();
        add_good(
            &server,
            &[
                ("name", "Cola"),
                ("quantity", "10"),
                ("price", "15.50"),
                ("description", "330ml can"),
                ("category", beverages.as_str()),
                ("customer", jane.as_str()),
            ],
        )
        .await;
        add_good(&server, &[("name", "Water"), ("quantity", "1"), ("price", "0.75")]).await;

        let page = dashboard(&server).await;
        let goods = page["goods"].as_array().unwrap();
        assert_eq!(goods.len(), 2);
        assert_eq!(goods[0]["name"], "Water");
        assert_eq!(goods[1]["name"], "Cola");
        assert_eq!(goods[1]["total_value"], "155.00");
        assert_eq!(goods[1]["price"], "15.50");
        assert_eq!(goods[1]["barcode"], "000000");
        assert_eq!(goods[1]["category_name"], "Beverages");
        assert_eq!(goods[1]["customer_name"], "Jane");

        logout(&server).await;
        signup_as(&server, "bob").await;
        let page = dashboard(&server).await;
        assert!(page["goods"].as_array().unwrap().is_empty());
        assert!(page["categories"].as_array().unwrap().is_empty());
        assert!(page["customers"].as_array().unwrap().is_empty());
        let search = data(&server.get("/search/").add_query_param("q", "cola").await);
        assert!(search["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_category_name() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        let beverages = add_category(&server, "Beverages").await.to_string();
        add_good(
            &server,
            &[("name", "Cola"), ("quantity", "1"), ("price", "1"), ("category", beverages.as_str())],
        )
        .await;
        add_good(&server, &[("name", "Hammer"), ("quantity", "1"), ("price", "9.99")]).await;

        let search = data(&server.get("/search/").add_query_param("q", "BEVER").await);
        let results = search["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "Cola");

        let empty = data(&server.get("/search/").await);
        assert!(empty["results"].as_array().unwrap().is_empty());

        let page = data(&server.get("/dashboard/").add_query_param("q", "hammer").await);
        assert_eq!(page["goods"].as_array().unwrap().len(), 1);
        assert_eq!(page["query"], "hammer");
    }

    #[tokio::test]
    async fn test_goods_form_errors_rerender_dashboard() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        let response = server
            .post("/dashboard/")
            .form(&[("submit_good", ""), ("name", ""), ("quantity", "ten"), ("price", "1.234")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let page = data(&response);
        assert_eq!(page["goods_errors"]["name"][0], "This field is required.");
        assert_eq!(page["goods_errors"]["quantity"][0], "Enter a whole number.");
        assert_eq!(
            page["goods_errors"]["price"][0],
            "Ensure that there are no more than 2 decimal places."
        );
        assert_eq!(page["goods_form"]["quantity"], "ten");
        assert!(page["goods"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_customer_email_must_be_gmail() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        let response = server
            .post("/customers/")
            .form(&[("name", "Jane"), ("email", "jane@yahoo.com"), ("phone", ""), ("address", "")])
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let view = data(&response);
        assert_eq!(view["errors"]["email"][0], "Only Gmail addresses are allowed.");
        assert!(view["customers"].as_array().unwrap().is_empty());

        let response = server
            .post("/customers/")
            .form(&[("name", "Jane"), ("email", "jane@gmail.com"), ("phone", "09171234567"), ("address", "Manila")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/customers/");
        let list = data(&server.get("/customers/").await);
        assert_eq!(list["customers"][0]["email"], "jane@gmail.com");
    }

    #[tokio::test]
    async fn test_edit_good_from_dashboard_and_edit_page() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        add_good(&server, &[("name", "Cola"), ("quantity", "1"), ("price", "1.00")]).await;
        let id = dashboard(&server).await["goods"][0]["id"].as_i64().unwrap().to_string();

        let page = data(&server.get("/dashboard/").add_query_param("edit_good", &id).await);
        assert_eq!(page["editing_good_id"].as_i64().unwrap().to_string(), id);
        assert_eq!(page["goods_form"]["name"], "Cola");
        assert_eq!(page["goods_form"]["price"], "1.00");

        server
            .post("/dashboard/")
            .add_query_param("edit_good", &id)
            .form(&[("submit_good", ""), ("name", "Diet Cola"), ("quantity", "4"), ("price", "2.50")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(&format!("/edit/{id}/"))
            .form(&[("name", "Cherry Cola"), ("quantity", "4"), ("price", "2.50")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard/");

        let goods = dashboard(&server).await["goods"].clone();
        assert_eq!(goods.as_array().unwrap().len(), 1);
        assert_eq!(goods[0]["name"], "Cherry Cola");
        assert_eq!(goods[0]["total_value"], "10.00");

        server
            .get("/dashboard/")
            .add_query_param("edit_good", "999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_users_rows_are_not_found() {
        let _guard = init_test_tracing();
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        let beverages = add_category(&server, "Beverages").await;
        let jane = add_customer(&server, "Jane", "").await;
        add_good(&server, &[("name", "Cola"), ("quantity", "1"), ("price", "1.00")]).await;
        let good = dashboard(&server).await["goods"][0]["id"].as_i64().unwrap();
        logout(&server).await;

        signup_as(&server, "bob").await;
        server.post(&format!("/delete/{good}/")).await.assert_status(StatusCode::NOT_FOUND);
        server.get(&format!("/edit/{good}/")).await.assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/categories/edit/{beverages}/"))
            .form(&[("category-name", "Mine")])
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/delete-category/{beverages}/"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/customers/delete/{jane}/"))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // A good may not point at another user's category.
        let stolen_category = beverages.to_string();
        let response = server
            .post("/dashboard/")
            .form(&[
                ("submit_good", ""),
                ("name", "Stolen"),
                ("quantity", "1"),
                ("price", "1"),
                ("category", stolen_category.as_str()),
            ])
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(data(&response)["goods_errors"]["category"][0], "Select a valid choice.");
        logout(&server).await;

        login_as(&server, "alice").await;
        let page = dashboard(&server).await;
        assert_eq!(page["goods"][0]["name"], "Cola");
        assert_eq!(page["categories"][0]["name"], "Beverages");
        assert_eq!(page["customers"][0]["name"], "Jane");
    }

    #[tokio::test]
    async fn test_deleting_category_removes_its_goods() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        let beverages = add_category(&server, "Beverages").await;
        let category = beverages.to_string();
        add_good(&server, &[("name", "Cola"), ("quantity", "1"), ("price", "1"), ("category", category.as_str())]).await;
        add_good(&server, &[("name", "Soap"), ("quantity", "1"), ("price", "1")]).await;

        let response = server.post(&format!("/delete-category/{beverages}/")).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/categories/");

        let page = dashboard(&server).await;
        let goods = page["goods"].as_array().unwrap();
        assert_eq!(goods.len(), 1);
        assert_eq!(goods[0]["name"], "Soap");
        assert!(page["categories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_pages() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        let response = server.post("/categories/").form(&[("category-name", "  ")]).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(data(&response)["errors"]["category-name"][0], "This field is required.");

        let response = server.post("/categories/").form(&[("category-name", "Snacks")]).await;
        response.assert_status(StatusCode::SEE_OTHER);
        let id = data(&server.get("/categories/").await)["categories"][0]["id"].as_i64().unwrap();

        let edit = data(&server.get(&format!("/categories/edit/{id}/")).await);
        assert_eq!(edit["form"]["category-name"], "Snacks");

        server
            .post(&format!("/categories/edit/{id}/"))
            .form(&[("category-name", "Chips")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let list = data(&server.get("/categories/").await);
        assert_eq!(list["categories"][0]["name"], "Chips");
    }

    #[tokio::test]
    async fn test_deleting_good_redirects_to_goods_list() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        add_good(&server, &[("name", "Cola"), ("quantity", "1"), ("price", "1")]).await;
        let id = dashboard(&server).await["goods"][0]["id"].as_i64().unwrap();

        let response = server.post(&format!("/delete/{id}/")).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/goods/");
        assert!(data(&server.get("/goods/").await)["goods"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_barcode_scan_and_lookup() {
        let _guard = init_test_tracing();
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        let category = add_category(&server, "Beverages").await.to_string();
        let customer = add_customer(&server, "Jane", "jane@gmail.com").await.to_string();

        let response = server
            .post("/barcode_scanner/")
            .form(&[
                ("barcode", "4801234567890"),
                ("name", "Cola"),
                ("quantity", "3"),
                ("price", "12.346"),
                ("description", "330ml"),
                ("category", category.as_str()),
                ("customer", customer.as_str()),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard/");

        let page = dashboard(&server).await;
        assert_eq!(page["messages"][0]["text"], PRODUCT_ADDED);
        assert_eq!(page["messages"][0]["level"], "success");
        assert_eq!(page["goods"][0]["price"], "12.35");
        assert!(dashboard(&server).await["messages"].as_array().unwrap().is_empty());

        let found = data(&server.post("/barcode_retrieve/").form(&[("barcode", "4801234567890")]).await);
        assert_eq!(found["product"]["name"], "Cola");
        assert_eq!(found["product"]["category_name"], "Beverages");

        let response = server.post("/barcode_retrieve/").form(&[("barcode", "0000")]).await;
        response.assert_status(StatusCode::OK);
        let missing = data(&response);
        assert!(missing["product"].is_null());
        assert_eq!(missing["messages"][0]["text"], PRODUCT_NOT_FOUND);

        let response = server
            .post("/barcode_scanner/")
            .form(&[("barcode", "1"), ("name", "Cola"), ("quantity", "many"), ("price", "1"),
                ("description", "x"), ("category", category.as_str()), ("customer", customer.as_str())])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/barcode_scanner/");
        let scanner = data(&server.get("/barcode_scanner/").await);
        assert_eq!(scanner["messages"][0]["text"], "Invalid quantity or price entered.");
        assert_eq!(scanner["categories"][0]["name"], "Beverages");
    }

    #[tokio::test]
    async fn test_barcode_scan_across_tenants_is_rejected() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        let category = add_category(&server, "Beverages").await.to_string();
        let customer = add_customer(&server, "Jane", "").await.to_string();
        logout(&server).await;

        signup_as(&server, "bob").await;
        let response = server
            .post("/barcode_scanner/")
            .form(&[
                ("barcode", "123"),
                ("name", "Cola"),
                ("quantity", "1"),
                ("price", "1.00"),
                ("description", "x"),
                ("category", category.as_str()),
                ("customer", customer.as_str()),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/barcode_scanner/");

        let scanner = data(&server.get("/barcode_scanner/").await);
        assert_eq!(scanner["messages"][0]["text"], "Invalid category or customer selection.");
        assert_eq!(scanner["messages"][0]["level"], "error");
        assert!(dashboard(&server).await["goods"].as_array().unwrap().is_empty());

        let response = server.post("/barcode_scanner/").form(&[("barcode", "123")]).await;
        response.assert_status(StatusCode::SEE_OTHER);
        let scanner = data(&server.get("/barcode_scanner/").await);
        assert_eq!(scanner["messages"][0]["text"], "All fields must be filled out.");
    }

    #[tokio::test]
    async fn test_non_numeric_ids_are_not_found() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        for path in ["/edit/abc/", "/categories/edit/abc/", "/customers/edit/abc/"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::NOT_FOUND);
            let body: Value = response.json();
            assert_eq!(body["code"], "NOT_FOUND", "{path}");
            assert_eq!(body["success"], false);
        }
        for path in ["/delete/abc/", "/delete-category/abc/", "/customers/delete/abc/"] {
            server.post(path).await.assert_status(StatusCode::NOT_FOUND);
        }

        logout(&server).await;
        let response = server.get("/edit/abc/").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/login/?next="));
    }

    #[tokio::test]
    async fn test_dashboard_forms_require_an_owned_edit_good() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;
        add_good(&server, &[("name", "Cola"), ("quantity", "1"), ("price", "1")]).await;
        let good = dashboard(&server).await["goods"][0]["id"].as_i64().unwrap().to_string();
        logout(&server).await;

        signup_as(&server, "bob").await;
        for edit_good in [good.as_str(), "999"] {
            server
                .post("/dashboard/")
                .add_query_param("edit_good", edit_good)
                .form(&[("submit_category", ""), ("category-name", "Beverages")])
                .await
                .assert_status(StatusCode::NOT_FOUND);
            server
                .post("/dashboard/")
                .add_query_param("edit_good", edit_good)
                .form(&[("submit_customer", ""), ("name", "Jane"), ("email", ""), ("phone", "")])
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }

        let page = dashboard(&server).await;
        assert!(page["categories"].as_array().unwrap().is_empty());
        assert!(page["customers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_requires_post() {
        let server = setup_test_server().await;
        signup_as(&server, "alice").await;

        server.get("/logout/").await.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(dashboard(&server).await["username"], "alice");

        logout(&server).await;
        server.get("/dashboard/").await.assert_status(StatusCode::SEE_OTHER);
    }
}
