//! Route helpers for the navigation screen: external maps deep links and the
//! embedded route map page.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::vendors::{Coordinates, Vendor};

/// Characters JavaScript's `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const ROUTE_MAP_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapsPlatform {
    Ios,
    Android,
}

impl std::str::FromStr for MapsPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(MapsPlatform::Ios),
            "android" => Ok(MapsPlatform::Android),
            other => Err(format!("unknown platform '{other}'; expected ios or android")),
        }
    }
}

/// Deep link that opens the platform's maps app on a labelled pin.
#[must_use]
pub fn external_maps_url(platform: MapsPlatform, label: &str, coordinates: Coordinates) -> String {
    let label = utf8_percent_encode(label, URI_COMPONENT);
    let lat_lng = format!("{},{}", coordinates.latitude, coordinates.longitude);
    match platform {
        MapsPlatform::Ios => format!("maps:0,0?q={label}@{lat_lng}"),
        MapsPlatform::Android => format!("geo:0,0?q={lat_lng}({label})"),
    }
}

/// Arithmetic midpoint of two coordinates, used to center the route map.
#[must_use]
pub fn midpoint(a: Coordinates, b: Coordinates) -> Coordinates {
    Coordinates {
        latitude: (a.latitude + b.latitude) / 2.0,
        longitude: (a.longitude + b.longitude) / 2.0,
    }
}

/// Render the self-contained HTML page showing the user and the vendor on a
/// Google map.
///
/// The vendor name and API key are written as JSON string literals so quotes
/// or `</script>` in either cannot break out of the page.
#[must_use]
pub fn render_route_map_html(user: Coordinates, vendor: &Vendor, api_key: &str) -> String {
    let target = vendor.location.coordinates;
    let center = midpoint(user, target);
    let vendor_title = js_string(&vendor.name);
    let api_key = js_string(api_key);

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
      #map {{ height: 100vh; width: 100vw; }}
    </style>
  </head>
  <body>
    <div id="map"></div>
    <script>
      function initMap() {{
        const map = new google.maps.Map(document.getElementById('map'), {{
          zoom: {ROUTE_MAP_ZOOM},
          center: {{ lat: {center_lat}, lng: {center_lng} }}
        }});

        new google.maps.Marker({{
          position: {{ lat: {user_lat}, lng: {user_lng} }},
          map: map,
          title: 'Your Location'
        }});

        new google.maps.Marker({{
          position: {{ lat: {vendor_lat}, lng: {vendor_lng} }},
          map: map,
          title: {vendor_title}
        }});
      }}

      const script = document.createElement('script');
      script.src = 'https://maps.googleapis.com/maps/api/js?key='
        + encodeURIComponent({api_key}) + '&callback=initMap';
      script.async = true;
      document.head.appendChild(script);
    </script>
  </body>
</html>
"#,
        center_lat = center.latitude,
        center_lng = center.longitude,
        user_lat = user.latitude,
        user_lng = user.longitude,
        vendor_lat = target.latitude,
        vendor_lng = target.longitude,
    )
}

/// Encode `value` as a JavaScript string literal safe to embed in `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_vendor;

    const GREEN_DREAMS: Coordinates = Coordinates {
        latitude: 61.217_381,
        longitude: -149.863_129,
    };

    #[test]
    fn ios_url_puts_label_before_coordinates() {
        let url = external_maps_url(MapsPlatform::Ios, "Green Dreams", GREEN_DREAMS);
        assert_eq!(url, "maps:0,0?q=Green%20Dreams@61.217381,-149.863129");
    }

    #[test]
    fn android_url_puts_label_in_parentheses() {
        let url = external_maps_url(MapsPlatform::Android, "Green Dreams", GREEN_DREAMS);
        assert_eq!(url, "geo:0,0?q=61.217381,-149.863129(Green%20Dreams)");
    }

    #[test]
    fn label_encoding_matches_encode_uri_component() {
        let url = external_maps_url(MapsPlatform::Ios, "Bud & Co's (North)", GREEN_DREAMS);
        assert!(url.starts_with("maps:0,0?q=Bud%20%26%20Co's%20(North)@"), "got {url}");
    }

    #[test]
    fn platform_parses_lowercase_names() {
        assert_eq!("ios".parse::<MapsPlatform>().unwrap(), MapsPlatform::Ios);
        assert_eq!("android".parse::<MapsPlatform>().unwrap(), MapsPlatform::Android);
        assert!("windows".parse::<MapsPlatform>().is_err());
    }

    #[test]
    fn midpoint_averages_both_axes() {
        let mid = midpoint(Coordinates::new(60.0, -150.0), Coordinates::new(62.0, -148.0));
        assert_eq!(mid, Coordinates::new(61.0, -149.0));
    }

    #[test]
    fn route_map_html_centers_between_user_and_vendor() {
        let vendor = sample_vendor("1", "Green Dreams");
        let user = Coordinates::new(61.0, -150.0);
        let html = render_route_map_html(user, &vendor, "test-key");

        let center = midpoint(user, vendor.location.coordinates);
        assert!(html.contains(&format!("lat: {}", center.latitude)));
        assert!(html.contains("zoom: 13"));
        assert!(html.contains("title: 'Your Location'"));
        assert!(html.contains("title: \"Green Dreams\""));
        assert!(html.contains("encodeURIComponent(\"test-key\")"));
    }

    #[test]
    fn route_map_html_escapes_vendor_name() {
        let vendor = sample_vendor("1", "Evil'</script><script>alert(1)");
        let html = render_route_map_html(Coordinates::new(61.0, -150.0), &vendor, "k");
        assert!(!html.contains("</script><script>alert"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }
}
