pub fn render_index() -> &'static str {
    INDEX_HTML
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Download Statistics</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
  <script src="https://cdn.jsdelivr.net/npm/chartjs-adapter-date-fns@3.0.0/dist/chartjs-adapter-date-fns.bundle.min.js"></script>
  <style>
    :root {
      --bg-1: #101521;
      --bg-2: #1b2436;
      --ink: #e8ecf4;
      --muted: #93a0b4;
      --accent: #4bc0c0;
      --card: #182032;
      --line: #2a3650;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1020px, 100%);
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 18px;
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .controls {
      display: grid;
      grid-template-columns: 2fr 1fr 1fr 1fr;
      gap: 14px;
    }

    .controls label {
      display: grid;
      gap: 6px;
      font-size: 0.8rem;
      color: var(--muted);
      text-transform: uppercase;
      letter-spacing: 0.06em;
    }

    .controls input,
    .controls select {
      background: var(--bg-1);
      color: var(--ink);
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 8px 10px;
      font-size: 0.95rem;
    }

    .controls input:focus,
    .controls select:focus {
      outline: 2px solid var(--accent);
    }

    #error {
      display: none;
      background: #3c1f27;
      border: 1px solid #77333f;
      color: #f3b6bf;
      border-radius: 8px;
      padding: 10px 14px;
      font-size: 0.9rem;
    }

    #basic-stats {
      color: var(--muted);
      font-size: 0.95rem;
    }

    @media (max-width: 720px) {
      .controls {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Download Statistics</h1>
      <p class="subtitle">Per-architecture downloads over time for each tracked ref.</p>
    </header>

    <div class="controls">
      <label>
        Ref
        <input id="ref" list="refs" autocomplete="off" />
        <datalist id="refs"></datalist>
      </label>
      <label>
        Interval
        <select id="interval-select">
          <option value="infinity">All time</option>
          <option value="7">Last week</option>
          <option value="30">Last month</option>
          <option value="90">Last quarter</option>
          <option value="365">Last year</option>
        </select>
      </label>
      <label>
        Granularity
        <select id="granularity">
          <option value="1">Daily</option>
          <option value="7">Weekly</option>
          <option value="30">Monthly</option>
        </select>
      </label>
      <label>
        Download type
        <select id="downloadType">
          <option value="installs+updates">Installs + updates</option>
          <option value="installs">Installs</option>
          <option value="updates">Updates</option>
        </select>
      </label>
    </div>

    <div id="error"></div>
    <canvas id="chart" height="110"></canvas>
    <div id="basic-stats"></div>
  </main>

  <script>
    const CHART_COLORS = [
      "#ff6384", // red
      "#ff9f40", // orange
      "#ffcd56", // yellow
      "#4bc0c0", // green
      "#36a2eb", // blue
      "#9966ff", // purple
    ];

    let chart;
    let generation = 0;

    const refElement = document.getElementById("ref");
    const refsElement = document.getElementById("refs");
    const intervalElement = document.getElementById("interval-select");
    const granularityElement = document.getElementById("granularity");
    const downloadTypeElement = document.getElementById("downloadType");
    const errorElement = document.getElementById("error");
    const statsElement = document.getElementById("basic-stats");

    function initChart() {
      const ctx = document.getElementById("chart").getContext("2d");
      chart = new Chart(ctx, {
        type: "line",
        options: {
          tension: 0.5,
          borderCapStyle: "round",
          borderJoinStyle: "round",
          scales: {
            x: {
              type: "time",
              time: { minUnit: "day" },
            },
          },
          interaction: { mode: "x", intersect: false },
        },
      });
    }

    function queryFromControls() {
      const params = new URLSearchParams();
      params.set("ref", refElement.value);
      params.set("interval", intervalElement.value);
      params.set("granularity", granularityElement.value);
      params.set("downloadType", downloadTypeElement.value);
      return params.toString();
    }

    function showError(message) {
      errorElement.textContent = message;
      errorElement.style.display = "block";
    }

    // Fetches the datasets for a fragment-shaped query and applies the
    // server's canonical answer. A stale response (one superseded by a newer
    // request) is dropped so rapid control changes never apply out of order.
    async function refresh(query) {
      const requestId = ++generation;
      let body;
      try {
        const response = await fetch("api/datasets?" + query);
        if (!response.ok) {
          throw new Error(await response.text());
        }
        body = await response.json();
      } catch (err) {
        if (requestId === generation) {
          showError("Failed to load data: " + err.message);
        }
        return;
      }
      if (requestId !== generation) {
        return;
      }
      errorElement.style.display = "none";
      applyResponse(body);
    }

    function applyResponse(body) {
      refElement.value = body.ref;
      intervalElement.value = body.interval;
      granularityElement.value = String(body.granularity);
      downloadTypeElement.value = body.downloadType;
      history.replaceState(null, "", "#" + body.fragment);

      chart.data.datasets = body.datasets.map((dataset, index) => {
        const color = CHART_COLORS[index % CHART_COLORS.length];
        return {
          label: dataset.arch,
          borderColor: color,
          backgroundColor: color + "33",
          fill: true,
          data: dataset.points.map((point) => ({ x: point.date, y: point.downloads })),
        };
      });
      if (body.min_date) {
        chart.options.scales.x.min = body.min_date;
      } else {
        delete chart.options.scales.x.min;
      }
      chart.update();

      if (body.summary) {
        statsElement.textContent =
          "Total: " + body.summary.total + " downloads | Average: " +
          body.summary.average_per_day.toFixed(2) + " downloads per day";
      } else {
        statsElement.textContent = "No downloads recorded in this window.";
      }
    }

    async function init() {
      initChart();

      const response = await fetch("api/refs");
      if (!response.ok) {
        showError("Failed to load the list of refs.");
        return;
      }
      const refs = await response.json();
      for (const ref of refs) {
        const option = document.createElement("option");
        option.value = ref;
        refsElement.append(option);
      }

      for (const element of [refElement, intervalElement, granularityElement, downloadTypeElement]) {
        element.addEventListener("change", () => refresh(queryFromControls()));
      }

      await refresh(window.location.hash.substring(1));
    }

    window.addEventListener("DOMContentLoaded", init);
  </script>
</body>
</html>
"##;
