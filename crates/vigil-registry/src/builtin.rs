//! Built-in known-service table.
//!
//! Order matters only for identical keys; overlapping keys are resolved by
//! length (see [`crate::KnownServiceRegistry::lookup`]).

use vigil_core::enums::{Recommendation, RiskLevel};

use crate::{RegistryEntry, ServiceTemplate};

type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
    RiskLevel,
    Recommendation,
);

use Recommendation::{Allow, Block, Monitor};
use RiskLevel::{High, Low, Medium};

const BUILTIN: &[Row] = &[
    // Analytics and tag management
    (
        "googletagmanager.com",
        "Google Tag Manager",
        "Loads and manages marketing and analytics tags",
        &["page views", "device information", "referrer"],
        Low,
        Allow,
    ),
    (
        "google-analytics.com",
        "Google Analytics",
        "Measures site traffic and visitor behaviour",
        &["page views", "session duration", "approximate location", "device information"],
        Low,
        Allow,
    ),
    (
        "doubleclick.net",
        "Google DoubleClick",
        "Ad serving and cross-site ad targeting",
        &["advertising identifiers", "browsing history", "ad interactions"],
        High,
        Block,
    ),
    (
        "stats.g.doubleclick.net",
        "Google Analytics Beacon",
        "Collects demographic and interest reports for Google Analytics",
        &["advertising identifiers", "page views"],
        Medium,
        Monitor,
    ),
    (
        "googlesyndication.com",
        "Google AdSense",
        "Displays advertisements",
        &["advertising identifiers", "page context"],
        Medium,
        Monitor,
    ),
    (
        "segment.com",
        "Segment",
        "Customer data pipeline forwarding events to other tools",
        &["user events", "user identifiers", "device information"],
        Medium,
        Monitor,
    ),
    (
        "mixpanel.com",
        "Mixpanel",
        "Product analytics",
        &["user events", "user identifiers"],
        Medium,
        Monitor,
    ),
    (
        "clarity.ms",
        "Microsoft Clarity",
        "Session recording and heatmaps",
        &["mouse movements", "clicks", "scroll depth", "page content"],
        Medium,
        Monitor,
    ),
    (
        "hotjar.com",
        "Hotjar",
        "Session recording and heatmaps",
        &["mouse movements", "clicks", "form interactions", "page content"],
        Medium,
        Monitor,
    ),
    (
        "fullstory.com",
        "FullStory",
        "Full session replay",
        &["keystrokes", "mouse movements", "page content"],
        High,
        Monitor,
    ),
    // Advertising and social pixels
    (
        "facebook.net",
        "Meta Pixel",
        "Conversion tracking and ad targeting for Meta platforms",
        &["page views", "purchase events", "browser identifiers"],
        High,
        Monitor,
    ),
    (
        "ads-twitter.com",
        "X (Twitter) Ads Pixel",
        "Conversion tracking for X advertising",
        &["page views", "conversion events"],
        High,
        Monitor,
    ),
    (
        "licdn.com",
        "LinkedIn Insight Tag",
        "Conversion tracking and audience building for LinkedIn ads",
        &["page views", "professional profile linkage"],
        Medium,
        Monitor,
    ),
    (
        "analytics.tiktok.com",
        "TikTok Pixel",
        "Conversion tracking for TikTok ads",
        &["page views", "conversion events", "device information"],
        High,
        Monitor,
    ),
    // Payments
    (
        "stripe.com",
        "Stripe",
        "Payment processing and fraud prevention",
        &["payment details", "device fingerprint for fraud detection"],
        Low,
        Allow,
    ),
    (
        "paypal.com",
        "PayPal",
        "Payment processing",
        &["payment details"],
        Low,
        Allow,
    ),
    // Support, monitoring, and infrastructure
    (
        "intercom.io",
        "Intercom",
        "Customer messaging widget",
        &["chat messages", "user identifiers", "email address"],
        Medium,
        Monitor,
    ),
    (
        "hs-scripts.com",
        "HubSpot",
        "Marketing automation and visitor tracking",
        &["page views", "form submissions", "email address"],
        Medium,
        Monitor,
    ),
    (
        "sentry-cdn.com",
        "Sentry",
        "Error monitoring",
        &["error reports", "browser information"],
        Low,
        Allow,
    ),
    (
        "js-agent.newrelic.com",
        "New Relic Browser",
        "Performance monitoring",
        &["page timings", "errors"],
        Low,
        Allow,
    ),
    (
        "gstatic.com",
        "Google Static Content",
        "Static assets for Google services such as reCAPTCHA and fonts",
        &["IP address"],
        Low,
        Allow,
    ),
    (
        "cdnjs.cloudflare.com",
        "cdnjs",
        "Public JavaScript library CDN",
        &["IP address"],
        Low,
        Allow,
    ),
    (
        "jsdelivr.net",
        "jsDelivr",
        "Public JavaScript library CDN",
        &["IP address"],
        Low,
        Allow,
    ),
    (
        "unpkg.com",
        "unpkg",
        "Public npm package CDN",
        &["IP address"],
        Low,
        Allow,
    ),
    (
        "youtube.com",
        "YouTube",
        "Embedded video player",
        &["viewing activity", "browser identifiers"],
        Medium,
        Monitor,
    ),
];

/// Materialize the built-in rows into registry entries, in table order.
#[must_use]
pub fn entries() -> Vec<RegistryEntry> {
    BUILTIN
        .iter()
        .map(
            |&(domain, name, purpose, data, risk_level, recommendation)| RegistryEntry {
                domain: domain.to_string(),
                template: ServiceTemplate {
                    name: name.to_string(),
                    purpose: purpose.to_string(),
                    data_collected: data.iter().map(|d| (*d).to_string()).collect(),
                    risk_level,
                    recommendation,
                },
            },
        )
        .collect()
}
