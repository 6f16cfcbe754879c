#[cfg(test)]
#[allow(clippy::expect_used)] // Tests panic on failure by design.
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use http::Uri;
    use movie_routes::{
        HistoryBaseLayer, NavigationError, Navigator, RouteTable, app,
        rating::{self, RatingScale},
        route::{Component, Page, PropValue, Props, RouteDef, RouteProps},
    };
    use serde_json::{Value, json};
    use tower::{ServiceBuilder, ServiceExt};

    // ==============================================================================
    // Test Helpers
    // ==============================================================================

    fn init_tracing() {
        drop(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_test_writer()
                .try_init(),
        );
    }

    #[derive(Debug)]
    struct HomePage;

    impl Page for HomePage {
        fn render(&self, _props: &RouteProps) -> String {
            "home".to_owned()
        }
    }

    /// Shows a movie's star rating, normalizing whatever the catalog holds.
    #[derive(Debug)]
    struct DetailPage {
        ratings: HashMap<u64, Value>,
    }

    impl Page for DetailPage {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn render(&self, props: &RouteProps) -> String {
            match props.number("id") {
                Some(id) if id.is_finite() && id >= 0.0 && id.fract() == 0.0 => {
                    let raw = self.ratings.get(&(id as u64)).unwrap_or(&Value::Null);
                    format!("movie {id}: {} stars", rating::normalize(raw))
                }
                _ => "unknown movie".to_owned(),
            }
        }
    }

    #[derive(Debug)]
    struct NotFoundPage;

    impl Page for NotFoundPage {
        fn render(&self, _props: &RouteProps) -> String {
            "not found".to_owned()
        }
    }

    fn catalog() -> HashMap<u64, Value> {
        HashMap::from([
            (1, json!(4)),
            (2, json!("4.9 stars")),
            (3, json!(12)),
            (4, json!("n/a")),
        ])
    }

    /// The application table with a detail loader that counts its calls.
    fn counted_app() -> (RouteTable, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let table = app::routes(HomePage, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                DetailPage {
                    ratings: catalog(),
                }
            }
        })
        .expect("valid table");
        (table, loads)
    }

    fn uri(location: &str) -> Uri {
        location.parse().expect("valid URI")
    }

    // ==============================================================================
    // Route Resolution
    // ==============================================================================

    #[tokio::test]
    async fn root_resolves_home_without_props() {
        init_tracing();
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator.navigate("/").await.expect("home resolves");
        assert_eq!(route.pattern.as_deref(), Some("/"));
        assert_eq!(route.name, None);
        assert!(route.params.is_empty());
        assert!(route.props.is_empty());
        assert_eq!(route.render(), "home");
    }

    #[tokio::test]
    async fn numeric_segment_resolves_detail() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator.navigate("/42").await.expect("detail resolves");
        assert_eq!(route.pattern.as_deref(), Some("/:id"));
        assert_eq!(route.name.as_deref(), Some(app::DETAIL_ROUTE));
        assert_eq!(route.params.get("id"), Some("42"));
        assert_eq!(route.props.get("id"), Some(&PropValue::Number(42.0)));
    }

    #[tokio::test]
    async fn non_numeric_segment_passes_nan() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator.navigate("/abc").await.expect("detail resolves");
        assert_eq!(route.pattern.as_deref(), Some("/:id"));
        assert!(route.props.number("id").is_some_and(f64::is_nan));
        assert_eq!(route.render(), "unknown movie");
    }

    #[tokio::test]
    async fn blank_segment_coerces_to_zero() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator.navigate("/%20").await.expect("detail resolves");
        assert_eq!(route.params.get("id"), Some(" "));
        assert_eq!(route.props.number("id"), Some(0.0));
    }

    #[tokio::test]
    async fn query_and_fragment_take_no_part_in_matching() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator
            .navigate("/7?tab=cast#reviews")
            .await
            .expect("detail resolves");
        assert_eq!(&*route.path, "/7");
        assert_eq!(route.props.number("id"), Some(7.0));
    }

    #[tokio::test]
    async fn trailing_slash_resolves_detail() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator.navigate("/42/").await.expect("detail resolves");
        assert_eq!(route.pattern.as_deref(), Some("/:id"));
        assert_eq!(route.props.get("id"), Some(&PropValue::Number(42.0)));

        let err = navigator
            .navigate("/42/cast")
            .await
            .expect_err("unmatched");
        assert!(matches!(err, NavigationError::NotFound { .. }));
        assert!(navigator.navigate("/42//").await.is_err());
    }

    #[tokio::test]
    async fn detail_page_renders_normalized_ratings() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let mut rendered = Vec::new();
        for location in ["/1", "/2", "/3", "/4", "/5"] {
            let route = navigator.navigate(location).await.expect("resolves");
            rendered.push(route.render());
        }

        assert_eq!(
            rendered,
            [
                "movie 1: 4 stars",
                "movie 2: 4 stars",
                "movie 3: 5 stars",
                "movie 4: 0 stars",
                "movie 5: 0 stars",
            ]
        );
    }

    // ==============================================================================
    // Lazy Loading
    // ==============================================================================

    #[tokio::test]
    async fn detail_page_is_not_loaded_until_visited() {
        let (table, loads) = counted_app();
        let navigator = Navigator::new(table);

        navigator.navigate("/").await.expect("home resolves");
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        let detail = navigator
            .table()
            .component(app::DETAIL_ROUTE)
            .expect("detail route");
        assert!(!detail.is_loaded());

        navigator.navigate("/1").await.expect("detail resolves");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(detail.is_loaded());
    }

    #[tokio::test]
    async fn detail_page_loads_once() {
        let (table, loads) = counted_app();
        let navigator = Navigator::new(table);

        let (a, b) = tokio::join!(navigator.navigate("/1"), navigator.navigate("/2"));
        a.expect("first resolves");
        b.expect("second resolves");
        navigator.navigate("/3").await.expect("third resolves");

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unmatched_locations_do_not_load_detail() {
        let (table, loads) = counted_app();
        let navigator = Navigator::new(table);

        assert!(navigator.navigate("/1/cast").await.is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    // ==============================================================================
    // Fallback
    // ==============================================================================

    #[tokio::test]
    async fn multi_segment_is_not_found() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let err = navigator
            .navigate("/1/cast")
            .await
            .expect_err("unmatched");
        assert!(matches!(err, NavigationError::NotFound { ref path } if path == "/1/cast"));
        assert_eq!(err.to_string(), "no route matches `/1/cast`");
    }

    #[tokio::test]
    async fn fallback_page() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table).fallback(Component::eager(NotFoundPage));

        let route = navigator.navigate("/a/b").await.expect("fallback resolves");
        assert!(route.is_fallback());
        assert!(route.props.is_empty());
        assert_eq!(route.render(), "not found");
    }

    #[tokio::test]
    async fn invalid_location() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let err = navigator.navigate("/a b").await.expect_err("invalid");
        assert!(matches!(err, NavigationError::InvalidLocation(_)));
    }

    #[tokio::test]
    async fn relative_location_is_rejected() {
        let (table, loads) = counted_app();
        let navigator = Navigator::new(table);

        for location in ["42", "movies"] {
            let err = navigator.navigate(location).await.expect_err("relative");
            assert!(
                matches!(err, NavigationError::RelativeLocation { location: ref l } if l == location)
            );
        }
        let err = navigator.navigate("42").await.expect_err("relative");
        assert_eq!(err.to_string(), "location `42` does not start with `/`");
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn relative_location_is_rejected_by_service() {
        let (table, _) = counted_app();
        let err = Navigator::new(table)
            .oneshot(uri("42"))
            .await
            .expect_err("relative");
        assert!(matches!(err, NavigationError::RelativeLocation { .. }));
    }

    // ==============================================================================
    // Service & Layers
    // ==============================================================================

    #[tokio::test]
    async fn navigator_is_a_service() {
        let (table, _) = counted_app();
        let navigator = Navigator::new(table);

        let route = navigator
            .clone()
            .oneshot(uri("/42"))
            .await
            .expect("detail resolves");
        assert_eq!(route.props.number("id"), Some(42.0));

        let route = navigator.oneshot(uri("/")).await.expect("home resolves");
        assert_eq!(route.render(), "home");
    }

    #[tokio::test]
    async fn history_base_is_stripped() {
        init_tracing();
        let (table, _) = counted_app();
        let navigator = ServiceBuilder::new()
            .layer(HistoryBaseLayer::new("/films"))
            .service(Navigator::new(table));

        let route = navigator
            .clone()
            .oneshot(uri("/films/2"))
            .await
            .expect("detail resolves");
        assert_eq!(route.props.number("id"), Some(2.0));

        let route = navigator
            .clone()
            .oneshot(uri("/films"))
            .await
            .expect("home resolves");
        assert_eq!(route.render(), "home");

        // Outside the base, the location is matched as-is.
        let route = navigator.oneshot(uri("/9")).await.expect("detail resolves");
        assert_eq!(route.props.number("id"), Some(9.0));
    }

    #[tokio::test]
    async fn shared_table_across_navigators() {
        let (table, loads) = counted_app();
        let table = Arc::new(table);
        let first = Navigator::new(Arc::clone(&table));
        let second = Navigator::new(Arc::clone(&table));

        first.navigate("/1").await.expect("resolves");
        second.navigate("/2").await.expect("resolves");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    // ==============================================================================
    // Named Routes
    // ==============================================================================

    #[tokio::test]
    async fn href_round_trips_through_navigation() {
        let (table, _) = counted_app();
        let location = table
            .href(app::DETAIL_ROUTE, &[(app::ID, "42")])
            .expect("href builds");
        assert_eq!(location, app::detail_location(42));

        let route = Navigator::new(table)
            .navigate(&location)
            .await
            .expect("resolves");
        assert_eq!(route.props.number("id"), Some(42.0));
    }

    #[tokio::test]
    async fn custom_tables_compose() {
        let table = RouteTable::builder()
            .route(RouteDef::new("/", Component::eager(HomePage)))
            .route(RouteDef::new("/genres/:genre", Component::eager(HomePage)).props(Props::Params))
            .build()
            .expect("valid table");

        let route = Navigator::new(table)
            .navigate("/genres/sci%2Dfi")
            .await
            .expect("resolves");
        assert_eq!(route.props.text("genre"), Some("sci-fi"));
    }

    // ==============================================================================
    // Rating Normalization
    // ==============================================================================

    #[test]
    fn rating_properties() {
        assert_eq!(rating::normalize(&json!("10")), 5);
        assert_eq!(rating::normalize(&json!("abc")), 0);
        assert_eq!(rating::normalize(&Value::Null), 0);
        assert_eq!(rating::normalize(&json!(-3)), 0);
        assert_eq!(rating::normalize_within(&json!("10"), 0, 5), 5);
        for r in 0..=5 {
            assert_eq!(rating::normalize(&json!(r)), r);
        }
    }

    #[test]
    fn rating_from_payload_field() {
        let movie = json!({ "title": "Heat", "rating": "4.5/5" });
        assert_eq!(rating::normalize(&movie["rating"]), 4);
        // Indexing a missing field yields `null`.
        assert_eq!(rating::normalize(&movie["votes"]), 0);
    }

    #[test]
    fn rating_scale() {
        let ten = RatingScale::new(1, 10).expect("valid scale");
        assert_eq!(ten.normalize(&json!("7.8")), 7);
        assert_eq!(ten.normalize(&json!(null)), 1);
        assert!(RatingScale::new(10, 1).is_err());
    }
}
