//! Result Rendering
//!
//! Turns decoded predictions into the HTML fragments placed in each form's
//! result area. All interpolated text is escaped.

use crate::charts::GLOBAL_AVERAGE_FOOTPRINT;
use crate::format;
use crate::prediction::{
    CarbonPrediction, EsgPrediction, PackagingPrediction, PredictionResult, ProductRecommendation,
    ProductRecommendations,
};

/// Shown when the product list is empty
pub const NO_PRODUCTS_MESSAGE: &str = "No products found matching your criteria.";

/// Fragment for a successful prediction
pub fn success_fragment(result: &PredictionResult) -> String {
    match result {
        PredictionResult::Packaging(p) => packaging(p),
        PredictionResult::Carbon(c) => carbon(c),
        PredictionResult::Products(p) => products(p),
        PredictionResult::Esg(e) => esg(e),
    }
}

/// Uniform error fragment
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger">
    <h6><i class="fas fa-exclamation-triangle me-2"></i>Error</h6>
    <p class="mb-0">{}</p>
</div>"#,
        escape(message)
    )
}

fn packaging(p: &PackagingPrediction) -> String {
    format!(
        r#"<div class="alert alert-success">
    <h6><i class="fas fa-box me-2"></i>Recommended Packaging:</h6>
    <p class="mb-1"><strong>{}</strong></p>
    <small class="text-muted">Confidence: {}</small>
</div>"#,
        escape(&p.prediction),
        format::ratio_percent(p.confidence)
    )
}

fn carbon(c: &CarbonPrediction) -> String {
    format!(
        r#"<div class="alert alert-success">
    <h6><i class="fas fa-leaf me-2"></i>Carbon Footprint:</h6>
    <p class="mb-1"><strong>{} tons CO2/year</strong></p>
    <small class="text-muted">Global average: {} tons CO2/year</small>
</div>"#,
        format::fixed(c.prediction, 2),
        GLOBAL_AVERAGE_FOOTPRINT
    )
}

fn products(p: &ProductRecommendations) -> String {
    let mut html = String::from(
        r#"<div class="alert alert-success"><h6><i class="fas fa-shopping-cart me-2"></i>Recommended Products:</h6>"#,
    );

    if p.recommendations.is_empty() {
        html.push_str(&format!(r#"<p class="mb-0">{}</p>"#, NO_PRODUCTS_MESSAGE));
    } else {
        for product in &p.recommendations {
            html.push_str(&product_item(product));
        }
    }

    html.push_str("</div>");
    html
}

fn product_item(product: &ProductRecommendation) -> String {
    let eco_badge = if product.eco_friendly {
        r#"<span class="badge bg-success ms-1">Eco-Friendly</span>"#
    } else {
        ""
    };

    format!(
        r#"<div class="product-item border rounded p-2 mb-2 bg-light">
    <div class="d-flex justify-content-between align-items-start">
        <div>
            <strong>Product #{id}</strong>
            <span class="badge bg-secondary ms-2">{category}</span>
            {eco_badge}
        </div>
        <div class="text-end">
            <div class="fw-bold">{price}</div>
            <small class="text-muted">Score: {score}</small>
        </div>
    </div>
    <div class="mt-1">
        <small class="text-muted">Sustainability: {sustainability}/10 | Rating: {rating}/5</small>
    </div>
</div>"#,
        id = product.product_id,
        category = escape(&product.category),
        eco_badge = eco_badge,
        price = format::currency(product.price),
        score = format::fixed(product.recommendation_score, 1),
        sustainability = format::fixed(product.sustainability_score, 1),
        rating = format::fixed(product.rating, 1),
    )
}

fn esg(e: &EsgPrediction) -> String {
    let s = &e.esg_scores;
    let cells = [
        (s.e_score, "text-success", "Environmental"),
        (s.s_score, "text-info", "Social"),
        (s.g_score, "text-warning", "Governance"),
        (s.overall_esg, "text-primary", "Overall ESG"),
    ];

    let columns: String = cells
        .iter()
        .map(|(score, class, label)| {
            format!(
                r#"
        <div class="col-3">
            <div class="h4 {}">{}</div>
            <small class="text-muted">{}</small>
        </div>"#,
                class,
                format::fixed(*score, 1),
                label
            )
        })
        .collect();

    format!(
        r#"<div class="alert alert-success">
    <h6><i class="fas fa-chart-bar me-2"></i>ESG Analysis Results:</h6>
    <div class="row text-center mt-3">{}
    </div>
</div>"#,
        columns
    )
}

/// Plain-text summary for terminal output
pub fn text_summary(result: &PredictionResult) -> String {
    match result {
        PredictionResult::Packaging(p) => format!(
            "Recommended packaging: {} (confidence {})",
            p.prediction,
            format::ratio_percent(p.confidence)
        ),
        PredictionResult::Carbon(c) => {
            let mut out = format!(
                "Carbon footprint: {} tons CO2/year (global average {})",
                format::fixed(c.prediction, 2),
                GLOBAL_AVERAGE_FOOTPRINT
            );
            if let Some(breakdown) = &c.breakdown {
                let spec = crate::charts::ChartSpec::carbon_breakdown(breakdown);
                for i in 0..spec.labels.len() {
                    if let Some(line) = spec.point_label(0, i) {
                        out.push_str("\n  ");
                        out.push_str(&line);
                    }
                }
            }
            out
        }
        PredictionResult::Products(p) if p.recommendations.is_empty() => {
            NO_PRODUCTS_MESSAGE.to_string()
        }
        PredictionResult::Products(p) => p
            .recommendations
            .iter()
            .map(|r| {
                format!(
                    "#{:<6} {:<12} {:>10}  score {}  sustainability {}/10  rating {}/5{}",
                    r.product_id,
                    r.category,
                    format::currency(r.price),
                    format::fixed(r.recommendation_score, 1),
                    format::fixed(r.sustainability_score, 1),
                    format::fixed(r.rating, 1),
                    if r.eco_friendly { "  [eco]" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        PredictionResult::Esg(e) => {
            let s = &e.esg_scores;
            format!(
                "Environmental {}  Social {}  Governance {}  Overall ESG {}",
                format::fixed(s.e_score, 1),
                format::fixed(s.s_score, 1),
                format::fixed(s.g_score, 1),
                format::fixed(s.overall_esg, 1)
            )
        }
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
