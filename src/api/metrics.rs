use actix_web::HttpResponse;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIENT_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static SERVER_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

/// Counts one finished request by its response status
pub fn record_response(status: u16) {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
    match status {
        400..=499 => {
            CLIENT_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        500..=599 => {
            SERVER_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        _ => {}
    }
}

fn render() -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP error responses\n\
         # TYPE http_errors_total counter\n\
         http_errors_total{{class=\"4xx\"}} {}\n\
         http_errors_total{{class=\"5xx\"}} {}\n",
        REQUEST_COUNT.load(Ordering::Relaxed),
        CLIENT_ERROR_COUNT.load(Ordering::Relaxed),
        SERVER_ERROR_COUNT.load(Ordering::Relaxed),
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition of request counters", content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str, series: &str) -> u64 {
        text.lines()
            .find_map(|line| line.strip_prefix(series))
            .and_then(|rest| rest.trim().parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_counters_by_status_class() {
        let before = render();
        record_response(200);
        record_response(404);
        record_response(500);
        let after = render();

        // Counters are process-wide; other tests may bump them concurrently
        assert!(value(&after, "http_requests_total ") >= value(&before, "http_requests_total ") + 3);
        assert!(
            value(&after, "http_errors_total{class=\"4xx\"} ")
                >= value(&before, "http_errors_total{class=\"4xx\"} ") + 1
        );
        assert!(
            value(&after, "http_errors_total{class=\"5xx\"} ")
                >= value(&before, "http_errors_total{class=\"5xx\"} ") + 1
        );
    }
}
