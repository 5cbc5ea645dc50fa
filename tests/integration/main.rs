mod minify_plugin_tests;
