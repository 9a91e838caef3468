//! Wire shapes of `GET /api/v1/offers/`. Only the fields we read are
//! declared; everything else in the (large) OLX payload is ignored.

use serde::Deserialize;

use olxwatch_core::Listing;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
pub struct Offer {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub params: Vec<OfferParam>,
}

#[derive(Debug, Deserialize)]
pub struct OfferParam {
    #[serde(default)]
    pub key: String,
    pub value: Option<ParamValue>,
}

#[derive(Debug, Deserialize)]
pub struct ParamValue {
    pub label: Option<String>,
}

impl Offer {
    /// Human-readable price, taken from the `price` param when present.
    fn price_label(&self) -> Option<String> {
        self.params
            .iter()
            .find(|p| p.key == "price")
            .and_then(|p| p.value.as_ref())
            .and_then(|v| v.label.clone())
    }
}

impl SearchResponse {
    /// Flatten into core listings, preserving the source order.
    ///
    /// Offers without a URL carry no identity for duplicate suppression and
    /// are dropped.
    pub fn into_listings(self) -> Vec<Listing> {
        self.data
            .into_iter()
            .filter_map(|offer| {
                let price_label = offer.price_label();
                let url = offer.url?;
                Some(Listing {
                    title: offer.title.unwrap_or_else(|| "No title".to_string()),
                    url,
                    price_label,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offer_with_price_param() {
        let body = r#"{
            "data": [{
                "id": 12345,
                "title": "iPhone 13",
                "url": "https://www.olx.ua/d/obyavlenie/iphone-13.html",
                "params": [
                    {"key": "state", "value": {"label": "Used"}},
                    {"key": "price", "value": {"label": "15 000 грн."}}
                ]
            }],
            "metadata": {"total_elements": 1}
        }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let listings = resp.into_listings();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "iPhone 13");
        assert_eq!(
            listings[0].url,
            "https://www.olx.ua/d/obyavlenie/iphone-13.html"
        );
        assert_eq!(listings[0].price_label.as_deref(), Some("15 000 грн."));
    }

    #[test]
    fn drops_offers_without_url() {
        let body = r#"{"data": [
            {"title": "no link", "params": []},
            {"title": "linked", "url": "https://www.olx.ua/d/x.html", "params": []}
        ]}"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let listings = resp.into_listings();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].url, "https://www.olx.ua/d/x.html");
    }

    #[test]
    fn missing_price_and_title_are_tolerated() {
        let body = r#"{"data": [{"url": "https://www.olx.ua/d/y.html"}]}"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let listings = resp.into_listings();
        assert_eq!(listings[0].title, "No title");
        assert!(listings[0].price_label.is_none());
    }

    #[test]
    fn missing_data_field_is_empty() {
        let resp: SearchResponse = serde_json::from_str(r#"{"metadata": {}}"#).unwrap();
        assert!(resp.into_listings().is_empty());
    }

    #[test]
    fn preserves_source_order() {
        let body = r#"{"data": [
            {"title": "b", "url": "https://www.olx.ua/d/b.html"},
            {"title": "a", "url": "https://www.olx.ua/d/a.html"}
        ]}"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let urls: Vec<_> = resp.into_listings().into_iter().map(|l| l.url).collect();
        assert_eq!(
            urls,
            vec!["https://www.olx.ua/d/b.html", "https://www.olx.ua/d/a.html"]
        );
    }
}
