mod render_pipeline_test;
