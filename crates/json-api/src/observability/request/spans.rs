//! HTTP span naming.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    /// Low-cardinality route, e.g. `/carts/{cart}/items/{product}`.
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = route_template(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace uuid segments with the placeholder of the collection they belong to.
fn route_template(path: &str) -> String {
    let mut previous = "";
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let template = if Uuid::parse_str(segment).is_ok() {
                match previous {
                    "carts" => "{cart}",
                    "items" => "{product}",
                    _ => "{uuid}",
                }
            } else {
                segment
            };

            previous = segment;
            template
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_and_product_ids_become_placeholders() {
        let names = request_span_name(
            "PATCH",
            "/carts/0192a3b4-5c6d-7e8f-9012-3456789abcde/items/0192a3b4-5c6d-7e8f-9012-3456789abcdf",
        );

        assert_eq!(names.otel_path, "/carts/{cart}/items/{product}");
        assert_eq!(names.otel_span_name, "PATCH /carts/{cart}/items/{product}");
    }

    #[test]
    fn unknown_collections_fall_back_to_uuid() {
        assert_eq!(
            route_template("/users/0192a3b4-5c6d-7e8f-9012-3456789abcde"),
            "/users/{uuid}"
        );
    }

    #[test]
    fn static_paths_are_kept() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template("/healthz"), "/healthz");
        assert_eq!(route_template("/carts/not-a-uuid/"), "/carts/not-a-uuid");
    }
}
