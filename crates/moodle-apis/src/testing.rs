//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use url::Url;

use crate::catalog::{DEFAULT_SOURCE_URL, build_dataset};
use crate::index::CatalogIndex;
use crate::model::Dataset;

pub const FIXTURE_HTML: &str = r##"<!doctype html>
<html>
<head><title>APIs | Moodle Developer Resources</title></head>
<body>
<nav><a href="/docs/4.5">Docs</a></nav>
<article>
<div class="theme-doc-markdown markdown">
<header><h1>API Guides</h1></header>
<p>Moodle has a number of core APIs.</p>
<h2 class="anchor" id="caching-api">Caching API<a href="#caching-api" class="hash-link">&#8203;</a></h2>
<h3 class="anchor" id="cachingapi-cache-api">Cache store API (cache) - overview<a href="#cachingapi-cache-api" class="hash-link">&#8203;</a></h3>
<p>Provides key-value caching.</p>
<table><tr><td><a href="https://example/cache">Cache docs</a></td></tr></table>
<h2 class="anchor" id="core-apis">Core APIs<a href="#core-apis" class="hash-link">&#8203;</a></h2>
<h3 class="anchor" id="access-api">Access API</h3>
<p>Checks  capabilities
   and roles. See <a href="/docs/4.5/apis/subsystems/access">Access docs</a>.</p>
<h3 class="anchor" id="quiz-attempt-api">Quiz attempt API</h3>
<p>Manages the quiz attempt lifecycle.</p>
<ul>
<li>Start an attempt</li>
<li>Finish it, see <a href="https://example/attempts">attempt docs</a></li>
</ul>
<h3 class="anchor" id="core-cache-definitions">Cache definitions (cache)</h3>
<p>Declares cache definitions for plugins.</p>
<h3 class="anchor" id="quiz-reports">Quiz reports</h3>
<p>Reports for quizzes.</p>
<h2 class="anchor" id="plugintypes">Plugin types</h2>
<h3 class="anchor" id="plugintypes-mod">Activity modules (mod)</h3>
<p>Activity module plugins. <a href="https://example/mod">Module docs</a> and <a href="https://example/mod">again</a>.</p>
<table><tr><td><a href="https://example/mod-table">Table link</a></td></tr></table>
<h3 class="anchor" id="plugintypes-access-api">Access API</h3>
<blockquote>Plugin access rules.</blockquote>
</div>
</article>
<footer><a href="/footer">Footer</a></footer>
</body>
</html>
"##;

pub fn source_url() -> Url {
    Url::parse(DEFAULT_SOURCE_URL).expect("valid url")
}

pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap()
}

pub fn fixture_dataset() -> Dataset {
    build_dataset(FIXTURE_HTML, &source_url(), fixture_time()).expect("fixture builds")
}

pub fn fixture_index() -> CatalogIndex {
    CatalogIndex::build(fixture_dataset()).0
}
