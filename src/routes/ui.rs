use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(SEARCH_PAGE)
}

const SEARCH_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>QA Digest - StackOverflow &amp; Reddit search</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 860px; color: #1d1d1f; }
    .row { display: flex; gap: 0.5rem; margin-bottom: 1rem; }
    input, select { padding: 0.5rem; }
    input[type=text], input[type=email] { flex: 1; }
    button { padding: 0.5rem 1rem; }
    button:disabled { opacity: 0.6; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    .card h3 { margin: 0 0 0.5rem 0; font-size: 1.05rem; }
    .meta { color: #666; font-size: 0.9rem; }
    .muted { color: #888; }
  </style>
</head>
<body>
  <h1>QA Digest</h1>
  <p>Search StackOverflow and Reddit at once, then email yourself the results.</p>

  <div class="row">
    <input id="search-query" type="text" placeholder="e.g. recursion" />
    <select id="sort-by">
      <option value="activity">Activity</option>
      <option value="votes">Votes</option>
      <option value="creation">Newest</option>
      <option value="relevance">Relevance</option>
    </select>
    <button id="search-btn">Search</button>
  </div>

  <div class="row">
    <input id="email" type="email" placeholder="you@example.com" />
    <button id="send-email-btn">Email results</button>
  </div>

  <div id="results"></div>

  <script>
    // All page state lives here and is handed to the functions that need it.
    const state = { results: [], searching: false };

    const resultsDiv = document.getElementById('results');
    const searchBtn = document.getElementById('search-btn');

    // Parsed into a detached document so nothing in the markup loads or runs.
    function textOf(html) {
      const parsed = new DOMParser().parseFromString(html, 'text/html');
      return parsed.body.textContent || '';
    }

    function link(href, text) {
      const a = document.createElement('a');
      a.href = href;
      a.target = '_blank';
      a.rel = 'noopener';
      a.textContent = text;
      return a;
    }

    async function loadTopAnswer(questionId, target) {
      try {
        const response = await fetch(`/questions/${questionId}/top-answer`);
        const data = response.ok ? await response.json() : { body: null };
        if (data.body) {
          const heading = document.createElement('h5');
          heading.textContent = 'Top Answer:';
          const p = document.createElement('p');
          p.textContent = textOf(data.body).slice(0, 200) + '...';
          target.replaceChildren(heading, p);
        } else {
          target.textContent = 'No top answer available';
          target.className = 'muted';
        }
      } catch (error) {
        target.textContent = 'No top answer available';
        target.className = 'muted';
      }
    }

    function renderResults(results, container) {
      container.replaceChildren();
      if (!results.length) {
        container.textContent = 'No results found.';
        return;
      }

      for (const item of results) {
        const card = document.createElement('div');
        card.className = 'card';
        const title = document.createElement('h3');
        title.appendChild(link(item.url, item.title));
        card.appendChild(title);

        const meta = document.createElement('div');
        meta.className = 'meta';
        if (item.source === 'stackOverflow') {
          meta.textContent = `Asked by ${item.author}` + (item.tags.length ? ` · ${item.tags.join(', ')}` : '');
          card.appendChild(meta);
          const answer = document.createElement('div');
          answer.className = 'muted';
          answer.textContent = 'Loading top answer...';
          card.appendChild(answer);
          if (item.questionId) {
            loadTopAnswer(item.questionId, answer);
          }
        } else {
          meta.textContent = `Posted by: ${item.author} in r/${item.communityLabel}`;
          card.appendChild(meta);
        }

        container.appendChild(card);
      }
    }

    async function runSearch(state) {
      // Ignore clicks while a search is already running.
      if (state.searching) {
        return;
      }

      const query = document.getElementById('search-query').value.trim();
      const sortBy = document.getElementById('sort-by').value;
      if (!query) {
        alert('Please enter a search query.');
        return;
      }

      state.searching = true;
      searchBtn.disabled = true;
      resultsDiv.textContent = 'Loading...';

      try {
        const response = await fetch(`/search?q=${encodeURIComponent(query)}&sort=${encodeURIComponent(sortBy)}`);
        if (!response.ok) {
          throw new Error(`search failed with ${response.status}`);
        }
        const data = await response.json();
        state.results = [...data.stackOverflow, ...data.reddit];
        renderResults(state.results, resultsDiv);
      } catch (error) {
        console.error('Error fetching data:', error);
        resultsDiv.textContent = 'Error fetching results. Please try again later.';
      } finally {
        state.searching = false;
        searchBtn.disabled = false;
      }
    }

    async function sendResults(state) {
      const email = document.getElementById('email').value.trim();
      if (!email || state.results.length === 0) {
        alert('Please enter a valid email and make sure to search first.');
        return;
      }

      try {
        const response = await fetch('/send-email', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ email, results: state.results }),
        });
        const data = await response.json();
        alert(response.ok ? data.message : data.error);
      } catch (error) {
        console.error('Error sending email:', error);
        alert('There was an error sending the email. Please try again later.');
      }
    }

    searchBtn.addEventListener('click', () => runSearch(state));
    document.getElementById('search-query').addEventListener('keydown', (event) => {
      if (event.key === 'Enter') {
        runSearch(state);
      }
    });
    document.getElementById('send-email-btn').addEventListener('click', () => sendResults(state));
  </script>
</body>
</html>"#;
